//! Simulated photo-gate receivers

use std::sync::{Arc, Mutex};

use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};
use hotwheels_core::traits::{Clock, SensorId};
use hotwheels_drivers::sensor::ActiveLevel;

use super::Bench;

/// Bench state unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

impl Error for SimFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Receiver output of one gate
pub struct SimPin<C> {
    bench: Arc<Mutex<Bench>>,
    clock: C,
    gate: SensorId,
    active: ActiveLevel,
}

impl<C: Clock> SimPin<C> {
    pub(super) fn new(
        bench: Arc<Mutex<Bench>>,
        clock: C,
        gate: SensorId,
        active: ActiveLevel,
    ) -> Self {
        Self {
            bench,
            clock,
            gate,
            active,
        }
    }

    fn beam_broken(&self) -> Result<bool, SimFault> {
        let now = self.clock.now();
        let bench = self.bench.lock().map_err(|_| SimFault)?;
        Ok(match self.gate {
            SensorId::Entry => bench.track.entry_blocked(now),
            SensorId::Exit => bench.track.exit_blocked(now),
        })
    }
}

impl<C> ErrorType for SimPin<C> {
    type Error = SimFault;
}

impl<C: Clock> InputPin for SimPin<C> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let broken = self.beam_broken()?;
        Ok(match self.active {
            ActiveLevel::High => broken,
            ActiveLevel::Low => !broken,
        })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
