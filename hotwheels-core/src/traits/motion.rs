//! Motion command adapter trait
//!
//! The sequencer moves the ramp, door and catcher through this trait. The
//! vendor motion controller (or the bench simulation) implements it.
//!
//! Moves are fire-and-forget: `move_to` returns once the command has been
//! handed to the controller, not when the axis arrives.

use crate::config::MotionProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Actuators on the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActuatorId {
    /// Tilts the ramp (degrees)
    Ramp,
    /// Gate holding the car at the top of the ramp (degrees)
    Door,
    /// Linear catcher carriage (meters)
    Catcher,
}

impl ActuatorId {
    /// All actuators, in shutdown order
    pub const ALL: [ActuatorId; 3] = [ActuatorId::Ramp, ActuatorId::Door, ActuatorId::Catcher];

    /// Short name for log output
    pub fn name(self) -> &'static str {
        match self {
            ActuatorId::Ramp => "ramp",
            ActuatorId::Door => "door",
            ActuatorId::Catcher => "catcher",
        }
    }
}

/// Errors reported by a motion adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Drive is not enabled
    Disabled,
    /// Controller reported an axis fault
    Fault,
    /// Target outside the axis' configured limits
    LimitExceeded,
    /// Axis or controller not initialized
    NotReady,
}

/// A single profiled move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorCommand {
    /// Axis to move
    pub actuator: ActuatorId,
    /// Absolute target in the axis' user units
    pub target: f64,
    /// Cruise velocity
    pub velocity: f64,
    /// Acceleration
    pub acceleration: f64,
    /// Deceleration
    pub deceleration: f64,
    /// S-curve jerk percentage (0-100)
    pub jerk_percent: f64,
}

impl ActuatorCommand {
    /// Build a move using the actuator's configured profile
    pub fn new(actuator: ActuatorId, target: f64, profile: &MotionProfile) -> Self {
        Self {
            actuator,
            target,
            velocity: profile.velocity,
            acceleration: profile.acceleration,
            deceleration: profile.deceleration,
            jerk_percent: profile.jerk_percent,
        }
    }
}

/// Capability interface to the motion controller
///
/// Methods take `&self` so one adapter can be shared by the control loop and
/// the shutdown watcher. Implementations must tolerate concurrent calls, and
/// `set_enabled(_, false)` must be idempotent.
pub trait MotionCommandAdapter {
    /// Start a profiled move; does not wait for completion
    fn move_to(&self, command: &ActuatorCommand) -> Result<(), MotionError>;

    /// Enable or disable an actuator's drive
    fn set_enabled(&self, actuator: ActuatorId, enabled: bool) -> Result<(), MotionError>;
}

impl<T: MotionCommandAdapter + ?Sized> MotionCommandAdapter for &T {
    fn move_to(&self, command: &ActuatorCommand) -> Result<(), MotionError> {
        (**self).move_to(command)
    }

    fn set_enabled(&self, actuator: ActuatorId, enabled: bool) -> Result<(), MotionError> {
        (**self).set_enabled(actuator, enabled)
    }
}
