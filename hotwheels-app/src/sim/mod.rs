//! Bench simulation backend
//!
//! Stands in for the motion controller and the photo-gate receivers so the
//! whole cycle can run without hardware. Axes accept moves instantly and a
//! rolling-car model decides when each beam is broken.

pub mod motion;
pub mod pin;
pub mod track;

use std::sync::{Arc, Mutex};

use hotwheels_core::config::SequencerConfig;
use hotwheels_core::traits::{ActuatorId, Clock, SensorId};
use hotwheels_drivers::sensor::ActiveLevel;

use crate::config::SimConfig;

pub use motion::{Axis, SimMotion};
pub use pin::SimPin;
pub use track::Track;

/// Shared simulated hardware
pub struct Bench {
    axes: [Axis; 3],
    ramp_max_deg: f64,
    door_max_deg: f64,
    catcher_min_m: f64,
    catcher_max_m: f64,
    track: Track,
}

impl Bench {
    /// Allowed travel of an axis
    fn travel(&self, actuator: ActuatorId) -> (f64, f64) {
        match actuator {
            ActuatorId::Ramp => (0.0, self.ramp_max_deg),
            ActuatorId::Door => (0.0, self.door_max_deg),
            ActuatorId::Catcher => (self.catcher_min_m, self.catcher_max_m),
        }
    }
}

/// Builds the simulated adapter and pins over one bench
pub struct SimBench<C> {
    bench: Arc<Mutex<Bench>>,
    clock: C,
}

impl<C: Clock + Clone> SimBench<C> {
    pub fn new(sim: &SimConfig, sequencer: &SequencerConfig, clock: C) -> Self {
        let bench = Bench {
            axes: [Axis::default(); 3],
            ramp_max_deg: sim.ramp_max_deg,
            door_max_deg: sim.door_max_deg,
            catcher_min_m: sequencer.limits.catcher_min_m,
            catcher_max_m: sequencer.limits.catcher_max_m,
            track: Track::new(
                sim.ramp_length_m,
                sim.car_length_m,
                sequencer.limits.sensor_distance_m,
                sequencer.ballistics.gravity_m_s2,
            ),
        };
        Self {
            bench: Arc::new(Mutex::new(bench)),
            clock,
        }
    }

    pub fn motion(&self) -> SimMotion<C> {
        SimMotion::new(Arc::clone(&self.bench), self.clock.clone())
    }

    pub fn pin(&self, gate: SensorId, active: ActiveLevel) -> SimPin<C> {
        SimPin::new(Arc::clone(&self.bench), self.clock.clone(), gate, active)
    }
}
