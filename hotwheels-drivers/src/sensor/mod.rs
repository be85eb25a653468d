//! Sensor drivers

pub mod photogate;

pub use photogate::{ActiveLevel, PhotoGate, PhotoGateConfig};
