//! Sensor timing
//!
//! Bounded-wait reads of the photo-gates.

pub mod timer;

pub use timer::{SensorOutcome, SensorTimer};
