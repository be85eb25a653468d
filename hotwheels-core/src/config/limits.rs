//! Mechanical and timing limits
//!
//! Process-wide values fixed at startup. The sequencer only reads them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lower end of the catcher rail (m)
pub const CATCHER_MIN_M: f64 = 0.0;

/// Upper end of the catcher rail (m)
pub const CATCHER_MAX_M: f64 = 0.84;

/// Distance between the entry and exit photo-gates (m)
pub const SENSOR_DISTANCE_M: f64 = 0.1;

/// Longest single sensor wait before reporting a timeout
pub const SENSOR_TIMEOUT_MS: u32 = 5000;

/// Interval between two sensor polls
pub const SENSOR_POLL_INTERVAL_MS: u32 = 1;

/// Safety and timing limits
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SafetyLimits {
    /// Catcher travel lower bound (m)
    pub catcher_min_m: f64,
    /// Catcher travel upper bound (m)
    pub catcher_max_m: f64,
    /// Photo-gate separation (m)
    pub sensor_distance_m: f64,
    /// Sensor wait timeout (ms)
    pub sensor_timeout_ms: u32,
    /// Sensor poll interval (ms)
    pub poll_interval_ms: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            catcher_min_m: CATCHER_MIN_M,
            catcher_max_m: CATCHER_MAX_M,
            sensor_distance_m: SENSOR_DISTANCE_M,
            sensor_timeout_ms: SENSOR_TIMEOUT_MS,
            poll_interval_ms: SENSOR_POLL_INTERVAL_MS,
        }
    }
}

impl SafetyLimits {
    /// Sensor timeout in seconds
    pub fn sensor_timeout_s(&self) -> f64 {
        f64::from(self.sensor_timeout_ms) / 1000.0
    }

    /// Check whether a catcher position lies on the rail
    pub fn catcher_contains(&self, position_m: f64) -> bool {
        position_m >= self.catcher_min_m && position_m <= self.catcher_max_m
    }
}
