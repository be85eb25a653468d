//! Bounded-wait sensor timing
//!
//! The only place the rig busy-waits on a sensor. One `read` polls the
//! sensor at a fixed interval until it fires, the wait times out, the read
//! faults, or shutdown is requested.

use embedded_hal::delay::DelayNs;

use crate::config::SafetyLimits;
use crate::safety::ShutdownFlag;
use crate::traits::{BinarySensor, Clock};

/// Result of one bounded sensor wait
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorOutcome {
    /// Sensor fired at this timestamp (s)
    Detected(f64),
    /// Wait ended early without an event (shutdown requested)
    NoEventYet,
    /// Sensor did not fire within the timeout
    TimedOut,
    /// The sensor read faulted
    ReadError,
}

impl SensorOutcome {
    /// Timestamp if the sensor fired
    pub fn timestamp(&self) -> Option<f64> {
        match self {
            SensorOutcome::Detected(t) => Some(*t),
            _ => None,
        }
    }

    /// Whether this outcome counts against the fault budget
    pub fn is_fault(&self) -> bool {
        matches!(self, SensorOutcome::TimedOut | SensorOutcome::ReadError)
    }
}

/// Polls binary sensors with a timeout
///
/// Owns the clock and the delay source; the sequencer borrows the delay for
/// its own idle waits through [`SensorTimer::pause_ms`].
pub struct SensorTimer<C, D> {
    clock: C,
    delay: D,
    timeout_s: f64,
    poll_interval_ms: u32,
    last_polls: u32,
}

impl<C: Clock, D: DelayNs> SensorTimer<C, D> {
    /// Create a timer from the rig's safety limits
    pub fn from_limits(clock: C, delay: D, limits: &SafetyLimits) -> Self {
        Self {
            clock,
            delay,
            timeout_s: limits.sensor_timeout_s(),
            poll_interval_ms: limits.poll_interval_ms,
            last_polls: 0,
        }
    }

    /// Current time (s)
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Poll interval (ms)
    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Number of samples taken by the last `read`
    pub fn last_polls(&self) -> u32 {
        self.last_polls
    }

    /// Block for `ms` milliseconds
    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Wait for `sensor` to fire
    ///
    /// `started_at` is the time the wait began; the call times out once
    /// `timeout` has elapsed since then. A raised `abort` flag ends the wait
    /// with [`SensorOutcome::NoEventYet`] at the next poll.
    pub fn read<S: BinarySensor>(
        &mut self,
        sensor: &mut S,
        started_at: f64,
        abort: &ShutdownFlag,
    ) -> SensorOutcome {
        self.last_polls = 0;
        loop {
            if abort.is_set() {
                return SensorOutcome::NoEventYet;
            }

            self.last_polls = self.last_polls.saturating_add(1);
            match sensor.is_triggered() {
                Ok(true) => return SensorOutcome::Detected(self.clock.now()),
                Ok(false) => {}
                Err(_) => return SensorOutcome::ReadError,
            }

            if self.clock.now() - started_at >= self.timeout_s {
                return SensorOutcome::TimedOut;
            }

            self.delay.delay_ms(self.poll_interval_ms);
        }
    }
}
