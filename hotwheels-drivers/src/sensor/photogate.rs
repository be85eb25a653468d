//! Photo-gate on a digital input
//!
//! A light barrier across the track. The receiver output changes level while
//! the beam is broken; which level that is depends on the module, so the
//! active level is configurable.
//!
//! Debouncing counts consecutive active samples. With a 1 ms poll interval
//! and the default of one sample, the first active read triggers.

use embedded_hal::digital::InputPin;
use hotwheels_core::traits::BinarySensor;

/// Pin level that means "beam broken"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Output goes high when interrupted
    #[default]
    High,
    /// Output goes low when interrupted (open-collector receivers)
    Low,
}

/// Photo-gate configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhotoGateConfig {
    /// Level reported while the beam is broken
    pub active: ActiveLevel,
    /// Consecutive active samples required before triggering (min 1)
    pub debounce_samples: u8,
}

impl Default for PhotoGateConfig {
    fn default() -> Self {
        Self {
            active: ActiveLevel::High,
            debounce_samples: 1,
        }
    }
}

/// Photo-gate sensor
pub struct PhotoGate<P> {
    pin: P,
    config: PhotoGateConfig,
    /// Consecutive active samples seen
    active_count: u8,
}

impl<P: InputPin> PhotoGate<P> {
    /// Create a photo-gate on `pin`
    pub fn new(pin: P, config: PhotoGateConfig) -> Self {
        Self {
            pin,
            config: PhotoGateConfig {
                debounce_samples: config.debounce_samples.max(1),
                ..config
            },
            active_count: 0,
        }
    }

    /// Photo-gate that triggers on the first high sample
    pub fn active_high(pin: P) -> Self {
        Self::new(pin, PhotoGateConfig::default())
    }

    /// Photo-gate that triggers on the first low sample
    pub fn active_low(pin: P) -> Self {
        Self::new(
            pin,
            PhotoGateConfig {
                active: ActiveLevel::Low,
                ..Default::default()
            },
        )
    }

    pub fn config(&self) -> &PhotoGateConfig {
        &self.config
    }
}

impl<P: InputPin> BinarySensor for PhotoGate<P> {
    type Error = P::Error;

    fn is_triggered(&mut self) -> Result<bool, Self::Error> {
        let active = match self.config.active {
            ActiveLevel::High => self.pin.is_high()?,
            ActiveLevel::Low => self.pin.is_low()?,
        };

        if active {
            self.active_count = self.active_count.saturating_add(1);
        } else {
            self.active_count = 0;
        }

        Ok(self.active_count >= self.config.debounce_samples)
    }
}
