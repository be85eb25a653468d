//! Hardware abstraction traits
//!
//! These traits define the interface between the launch logic and
//! hardware-specific implementations.

pub mod input;
pub mod motion;
pub mod sensor;

pub use input::AngleSource;
pub use motion::{ActuatorCommand, ActuatorId, MotionCommandAdapter, MotionError};
pub use sensor::{BinarySensor, Clock, SensorId};
