//! Sensor and clock traits

/// Photo-gates along the car's path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorId {
    /// Gate at the door, passed before release
    Entry,
    /// Gate after the door, one sensor distance further down
    Exit,
}

impl SensorId {
    /// Short name for log output
    pub fn name(self) -> &'static str {
        match self {
            SensorId::Entry => "entry",
            SensorId::Exit => "exit",
        }
    }
}

/// A binary sensor (photo-gate, limit switch)
///
/// Implementations handle active level and debouncing; the caller only sees
/// "triggered" or a read fault.
pub trait BinarySensor {
    /// Fault type of the underlying input
    type Error: core::fmt::Debug;

    /// Sample the sensor once
    fn is_triggered(&mut self) -> Result<bool, Self::Error>;
}

impl<T: BinarySensor + ?Sized> BinarySensor for &mut T {
    type Error = T::Error;

    fn is_triggered(&mut self) -> Result<bool, Self::Error> {
        (**self).is_triggered()
    }
}

/// Monotonic time source
pub trait Clock {
    /// Seconds since an arbitrary fixed epoch
    fn now(&self) -> f64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> f64 {
        (**self).now()
    }
}
