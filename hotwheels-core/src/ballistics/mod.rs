//! Ballistic prediction
//!
//! Converts two photo-gate timestamps and a launch angle into a landing
//! distance along the catcher rail.

pub mod predictor;

pub use predictor::{clamp_to_travel, landing, speed, BallisticPredictor, Prediction};
