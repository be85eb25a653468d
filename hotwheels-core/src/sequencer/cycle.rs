//! Per-cycle record

use crate::ballistics::Prediction;

/// Data gathered during one launch
///
/// Lives only for the duration of a cycle; a [`CycleSummary`] is kept once
/// the catcher has been commanded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaunchCycle {
    /// Commanded ramp angle, calibration applied (degrees)
    pub ramp_angle_deg: f64,
    /// Entry gate timestamp (s)
    pub entry_timestamp: Option<f64>,
    /// Exit gate timestamp (s)
    pub exit_timestamp: Option<f64>,
    /// Transit speed (m/s)
    pub speed_m_per_s: f64,
    /// Clamped catcher target (m)
    pub landing_position_m: f64,
}

impl LaunchCycle {
    pub fn new(ramp_angle_deg: f64) -> Self {
        Self {
            ramp_angle_deg,
            entry_timestamp: None,
            exit_timestamp: None,
            speed_m_per_s: 0.0,
            landing_position_m: 0.0,
        }
    }

    pub fn record_prediction(&mut self, prediction: &Prediction) {
        self.speed_m_per_s = prediction.speed_m_s;
        self.landing_position_m = prediction.landing_m;
    }
}

/// What is remembered about a completed launch
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleSummary {
    /// Commanded ramp angle (degrees)
    pub ramp_angle_deg: f64,
    /// Transit speed (m/s)
    pub speed_m_s: f64,
    /// Predicted landing before clamping (m)
    pub raw_landing_m: f64,
    /// Catcher target (m)
    pub landing_m: f64,
}

impl CycleSummary {
    pub fn new(cycle: &LaunchCycle, prediction: &Prediction) -> Self {
        Self {
            ramp_angle_deg: cycle.ramp_angle_deg,
            speed_m_s: cycle.speed_m_per_s,
            raw_landing_m: prediction.raw_landing_m,
            landing_m: cycle.landing_position_m,
        }
    }

    /// Whether the catcher could not reach the predicted landing
    pub fn was_clamped(&self) -> bool {
        self.raw_landing_m != self.landing_m
    }
}
