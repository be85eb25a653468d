//! Progress reports
//!
//! The sequencer never logs. Everything an operator may want to see is
//! handed to a caller-provided sink as a [`Report`].

use crate::ballistics::Prediction;
use crate::sensor::SensorOutcome;
use crate::state::{Event, LaunchState};
use crate::traits::{ActuatorCommand, ActuatorId, MotionError, SensorId};

/// One observable step of the sequencer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// State changed
    Transition {
        from: LaunchState,
        to: LaunchState,
        event: Event,
    },
    /// Move handed to the adapter
    MoveIssued(ActuatorCommand),
    /// Adapter rejected a move; the cycle carries on
    MoveFailed {
        actuator: ActuatorId,
        target: f64,
        error: MotionError,
    },
    /// A sensor wait timed out or faulted
    SensorFault {
        sensor: SensorId,
        outcome: SensorOutcome,
        consecutive: u32,
    },
    /// Outcome of one bounded read (debug sampling only)
    SensorSample {
        sensor: SensorId,
        outcome: SensorOutcome,
        polls: u32,
    },
    /// Landing computed for the commanded angle
    Prediction {
        angle_deg: f64,
        prediction: Prediction,
    },
    /// Fault budget exhausted, cycle abandoned
    WaitAbandoned { sensor: SensorId, faults: u32 },
    /// Drive accepted the disable request
    DriveDisabled(ActuatorId),
    /// Drive refused the disable request
    DisableFailed {
        actuator: ActuatorId,
        error: MotionError,
    },
    /// Stop sentinel received
    StopRequested,
}

impl Report {
    /// Reports that describe something going wrong
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            Report::MoveFailed { .. }
                | Report::SensorFault { .. }
                | Report::WaitAbandoned { .. }
                | Report::DisableFailed { .. }
        )
    }
}
