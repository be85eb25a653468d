//! Ballistic predictor
//!
//! Pure projectile kinematics under constant gravity, no drag. The car
//! leaves the ramp lip at the measured speed and launch angle, rises to its
//! apex, then falls the apex height plus the ramp height to the catcher
//! plane.
//!
//! ```text
//!   vx = v·cos θ          vy = v·sin θ
//!   t_rise = vy / g       h_max = vy² / 2g
//!   t_fall = √(2·(h_max + h_ramp) / g)
//!   x = vx · (t_rise + t_fall)
//! ```

use libm::{cos, sin, sqrt};

use crate::config::{BallisticsConfig, SafetyLimits, SequencerConfig};

/// Transit speed between two photo-gates
///
/// Returns `distance_m / (t2 - t1)` when the exit timestamp is after the
/// entry timestamp, and 0 otherwise.
pub fn speed(t1: f64, t2: f64, distance_m: f64) -> f64 {
    if t2 > t1 {
        distance_m / (t2 - t1)
    } else {
        0.0
    }
}

/// Horizontal landing distance for a launch speed and angle
///
/// The result is not clamped and may be negative or beyond the catcher
/// rail; see [`clamp_to_travel`].
pub fn landing(speed_m_s: f64, angle_deg: f64, ballistics: &BallisticsConfig) -> f64 {
    let g = ballistics.gravity_m_s2;
    let theta = angle_deg.to_radians();

    let vx = speed_m_s * cos(theta);
    let vy = speed_m_s * sin(theta);

    let t_rise = vy / g;
    let h_max = vy * vy / (2.0 * g);
    let t_fall = sqrt(2.0 * (h_max + ballistics.ramp_height_m) / g);

    vx * (t_rise + t_fall)
}

/// Clamp a landing distance onto the catcher rail
///
/// Non-finite input parks the catcher at the lower bound.
pub fn clamp_to_travel(position_m: f64, limits: &SafetyLimits) -> f64 {
    if position_m.is_nan() {
        return limits.catcher_min_m;
    }
    position_m.clamp(limits.catcher_min_m, limits.catcher_max_m)
}

/// Result of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Prediction {
    /// Measured transit speed (m/s)
    pub speed_m_s: f64,
    /// Unclamped landing distance (m)
    pub raw_landing_m: f64,
    /// Landing distance clamped to catcher travel (m)
    pub landing_m: f64,
}

impl Prediction {
    /// Whether the clamp moved the target
    pub fn was_clamped(&self) -> bool {
        self.raw_landing_m != self.landing_m
    }
}

/// Stateless predictor bound to one rig's geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticPredictor {
    limits: SafetyLimits,
    ballistics: BallisticsConfig,
}

impl BallisticPredictor {
    /// Create a predictor from limits and model parameters
    pub fn new(limits: SafetyLimits, ballistics: BallisticsConfig) -> Self {
        Self { limits, ballistics }
    }

    /// Create a predictor from a sequencer configuration
    pub fn from_config(config: &SequencerConfig) -> Self {
        Self::new(config.limits, config.ballistics)
    }

    /// Predict the catcher target from gate timestamps and launch angle
    pub fn predict(&self, entry_s: f64, exit_s: f64, angle_deg: f64) -> Prediction {
        let speed_m_s = speed(entry_s, exit_s, self.limits.sensor_distance_m);
        let raw_landing_m = landing(speed_m_s, angle_deg, &self.ballistics);
        Prediction {
            speed_m_s,
            raw_landing_m,
            landing_m: clamp_to_travel(raw_landing_m, &self.limits),
        }
    }
}
