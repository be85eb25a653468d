//! Configuration type definitions
//!
//! These types describe the rig. The host binary deserializes them from
//! TOML; every field has a default matching the bench rig.

use crate::traits::ActuatorId;

use super::calibration::RampCalibration;
use super::limits::SafetyLimits;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Angle input that requests a graceful stop instead of a launch
pub const STOP_SENTINEL_DEG: f64 = 1.23;

/// Settle time between two cycles
pub const COOLDOWN_MS: u32 = 3000;

/// Standard gravity (m/s²)
pub const DEFAULT_GRAVITY_M_S2: f64 = 9.81;

/// Height of the ramp lip above the catcher's reference plane (m)
pub const DEFAULT_RAMP_HEIGHT_M: f64 = 0.23;

/// Projectile model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BallisticsConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity_m_s2: f64,
    /// Launch height above the catcher plane (m)
    pub ramp_height_m: f64,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            gravity_m_s2: DEFAULT_GRAVITY_M_S2,
            ramp_height_m: DEFAULT_RAMP_HEIGHT_M,
        }
    }
}

/// S-curve move profile for one actuator
///
/// Units follow the axis: degrees for ramp and door, meters for the catcher.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionProfile {
    /// Cruise velocity (units/s)
    pub velocity: f64,
    /// Acceleration (units/s²)
    pub acceleration: f64,
    /// Deceleration (units/s²)
    pub deceleration: f64,
    /// Jerk as a percentage of the acceleration phase (0-100)
    pub jerk_percent: f64,
}

impl MotionProfile {
    /// Default ramp profile: slow and smooth, the car may already sit on it
    pub const RAMP: Self = Self {
        velocity: 20.0,
        acceleration: 100.0,
        deceleration: 100.0,
        jerk_percent: 50.0,
    };

    /// Default door profile: fast, the gate must clear the car
    pub const DOOR: Self = Self {
        velocity: 360.0,
        acceleration: 3600.0,
        deceleration: 3600.0,
        jerk_percent: 0.0,
    };

    /// Default catcher profile: must arrive before the car lands
    pub const CATCHER: Self = Self {
        velocity: 1.5,
        acceleration: 10.0,
        deceleration: 10.0,
        jerk_percent: 25.0,
    };

    fn is_valid(&self) -> bool {
        self.velocity > 0.0
            && self.acceleration > 0.0
            && self.deceleration > 0.0
            && (0.0..=100.0).contains(&self.jerk_percent)
    }
}

/// Per-actuator motion profiles, fixed at configuration time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionProfiles {
    pub ramp: MotionProfile,
    pub door: MotionProfile,
    pub catcher: MotionProfile,
}

impl Default for MotionProfiles {
    fn default() -> Self {
        Self {
            ramp: MotionProfile::RAMP,
            door: MotionProfile::DOOR,
            catcher: MotionProfile::CATCHER,
        }
    }
}

impl MotionProfiles {
    /// Profile for an actuator
    pub fn get(&self, actuator: ActuatorId) -> &MotionProfile {
        match actuator {
            ActuatorId::Ramp => &self.ramp,
            ActuatorId::Door => &self.door,
            ActuatorId::Catcher => &self.catcher,
        }
    }
}

/// What the sequencer does when a sensor wait keeps failing
///
/// A read fault or timeout never ends a single wait by itself; the policy
/// decides whether the enclosing wait gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorFaultPolicy {
    /// Keep waiting until the sensor fires or shutdown is requested.
    /// A dead sensor stalls the rig until the operator interrupts it.
    #[default]
    RetryForever,
    /// Give up the cycle after this many consecutive faults or timeouts
    Abandon { max_consecutive_faults: u32 },
}

impl SensorFaultPolicy {
    /// Whether a wait that has seen `faults` consecutive faults should stop
    pub fn gives_up_after(&self, faults: u32) -> bool {
        match self {
            SensorFaultPolicy::RetryForever => false,
            SensorFaultPolicy::Abandon {
                max_consecutive_faults,
            } => faults >= *max_consecutive_faults,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Catcher bounds empty, inverted or not finite
    InvalidCatcherTravel,
    /// Sensor separation must be positive
    InvalidSensorDistance,
    /// Timeout or poll interval is zero, or the interval exceeds the timeout
    InvalidSensorTiming,
    /// Gravity must be positive and ramp height non-negative
    InvalidBallistics,
    /// A motion profile has a non-positive rate or jerk outside 0-100
    InvalidProfile(ActuatorId),
    /// Abandon policy with a zero fault budget
    InvalidFaultPolicy,
    /// Calibration values must be finite
    InvalidCalibration,
}

/// Complete sequencer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequencerConfig {
    /// Travel and sensor limits
    pub limits: SafetyLimits,
    /// Projectile model
    pub ballistics: BallisticsConfig,
    /// Ramp offset and gate opening
    pub calibration: RampCalibration,
    /// Actuator move profiles
    pub profiles: MotionProfiles,
    /// Sensor fault handling
    pub fault_policy: SensorFaultPolicy,
    /// Settle delay after positioning the catcher (ms)
    pub cooldown_ms: u32,
    /// Input value that requests a stop
    pub stop_sentinel_deg: f64,
    /// Report every sensor read outcome (debug mode)
    pub debug_sensors: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            limits: SafetyLimits::default(),
            ballistics: BallisticsConfig::default(),
            calibration: RampCalibration::default(),
            profiles: MotionProfiles::default(),
            fault_policy: SensorFaultPolicy::default(),
            cooldown_ms: COOLDOWN_MS,
            stop_sentinel_deg: STOP_SENTINEL_DEG,
            debug_sensors: false,
        }
    }
}

impl SequencerConfig {
    /// Check the configuration for values the sequencer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.limits;
        if !(l.catcher_min_m.is_finite()
            && l.catcher_max_m.is_finite()
            && l.catcher_min_m < l.catcher_max_m)
        {
            return Err(ConfigError::InvalidCatcherTravel);
        }
        if !(l.sensor_distance_m.is_finite() && l.sensor_distance_m > 0.0) {
            return Err(ConfigError::InvalidSensorDistance);
        }
        if l.sensor_timeout_ms == 0
            || l.poll_interval_ms == 0
            || l.poll_interval_ms > l.sensor_timeout_ms
        {
            return Err(ConfigError::InvalidSensorTiming);
        }

        let b = &self.ballistics;
        if !(b.gravity_m_s2.is_finite()
            && b.gravity_m_s2 > 0.0
            && b.ramp_height_m.is_finite()
            && b.ramp_height_m >= 0.0)
        {
            return Err(ConfigError::InvalidBallistics);
        }

        for actuator in ActuatorId::ALL {
            if !self.profiles.get(actuator).is_valid() {
                return Err(ConfigError::InvalidProfile(actuator));
            }
        }

        if self.fault_policy.gives_up_after(0) {
            return Err(ConfigError::InvalidFaultPolicy);
        }

        let c = &self.calibration;
        if !(c.offset_deg.is_finite()
            && c.gate_base_deg.is_finite()
            && self.stop_sentinel_deg.is_finite())
        {
            return Err(ConfigError::InvalidCalibration);
        }

        Ok(())
    }

    /// Whether an input angle is the stop request
    pub fn is_stop_request(&self, input_deg: f64) -> bool {
        libm::fabs(input_deg - self.stop_sentinel_deg) < 1e-9
    }
}
