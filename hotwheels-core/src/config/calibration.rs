//! Ramp and gate calibration
//!
//! Empirical constants measured on the rig. They are applied once per cycle
//! by the sequencer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Door opening is expressed relative to this angle (degrees)
pub const GATE_BASE_DEG: f64 = 100.0;

/// Ramp calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RampCalibration {
    /// Offset subtracted from the requested ramp angle (degrees)
    pub offset_deg: f64,
    /// Door opening base angle; the door opens to `gate_base_deg - ramp`
    pub gate_base_deg: f64,
}

impl Default for RampCalibration {
    fn default() -> Self {
        Self {
            offset_deg: 0.0,
            gate_base_deg: GATE_BASE_DEG,
        }
    }
}

impl RampCalibration {
    /// Ramp angle actually commanded for a requested angle
    pub fn ramp_angle(&self, requested_deg: f64) -> f64 {
        requested_deg - self.offset_deg
    }

    /// Door target that releases the car at the given ramp angle
    pub fn gate_opening(&self, ramp_deg: f64) -> f64 {
        self.gate_base_deg - ramp_deg
    }
}
