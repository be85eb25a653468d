//! Simulated drives
//!
//! Each axis tracks its enable state and last commanded target. Moves are
//! accepted instantly; ramp and door moves feed the track model.

use std::sync::{Arc, Mutex};

use hotwheels_core::traits::{
    ActuatorCommand, ActuatorId, Clock, MotionCommandAdapter, MotionError,
};
use tracing::debug;

use super::Bench;

/// One simulated axis
#[derive(Debug, Clone, Copy, Default)]
pub struct Axis {
    pub enabled: bool,
    pub target: f64,
    pub moves: u32,
}

/// Motion adapter over the bench
///
/// Cheap to clone; all clones drive the same axes.
#[derive(Clone)]
pub struct SimMotion<C> {
    bench: Arc<Mutex<Bench>>,
    clock: C,
}

impl<C: Clock> SimMotion<C> {
    pub(super) fn new(bench: Arc<Mutex<Bench>>, clock: C) -> Self {
        Self { bench, clock }
    }

    /// Snapshot of one axis
    pub fn axis(&self, actuator: ActuatorId) -> Option<Axis> {
        let bench = self.bench.lock().ok()?;
        Some(bench.axes[index(actuator)])
    }
}

fn index(actuator: ActuatorId) -> usize {
    match actuator {
        ActuatorId::Ramp => 0,
        ActuatorId::Door => 1,
        ActuatorId::Catcher => 2,
    }
}

impl<C: Clock> MotionCommandAdapter for SimMotion<C> {
    fn move_to(&self, command: &ActuatorCommand) -> Result<(), MotionError> {
        let now = self.clock.now();
        let mut bench = self.bench.lock().map_err(|_| MotionError::Fault)?;

        let (min, max) = bench.travel(command.actuator);
        let axis = &mut bench.axes[index(command.actuator)];
        if !axis.enabled {
            return Err(MotionError::Disabled);
        }
        if !command.target.is_finite() || command.target < min || command.target > max {
            return Err(MotionError::LimitExceeded);
        }
        axis.target = command.target;
        axis.moves += 1;

        debug!(
            axis = command.actuator.name(),
            target = command.target,
            velocity = command.velocity,
            "sim move"
        );

        match command.actuator {
            ActuatorId::Ramp => bench.track.load(command.target, now),
            ActuatorId::Door => bench.track.door_moved(command.target, now),
            ActuatorId::Catcher => {}
        }
        Ok(())
    }

    fn set_enabled(&self, actuator: ActuatorId, enabled: bool) -> Result<(), MotionError> {
        let mut bench = self.bench.lock().map_err(|_| MotionError::Fault)?;
        bench.axes[index(actuator)].enabled = enabled;
        debug!(axis = actuator.name(), enabled, "sim drive");
        Ok(())
    }
}
