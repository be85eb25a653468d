//! State machine for the launch cycle
//!
//! Defines the authoritative ordering of actuator commands and sensor
//! waits. The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::LaunchState;
