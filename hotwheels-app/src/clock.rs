//! Host time source
//!
//! Timestamps come from the embassy-time std driver. Waits park the thread
//! instead of spinning, so a long sensor wait or cooldown leaves the CPU idle.

use std::thread;
use std::time::Duration;

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use hotwheels_core::traits::Clock;

/// Seconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_micros() as f64 / 1_000_000.0
    }
}

/// Delay that sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
