//! Board-agnostic core logic for the ramp launch rig
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (motion adapter, binary sensor, clock)
//! - Ballistic prediction (transit speed, landing distance, travel clamp)
//! - Bounded-wait sensor timing
//! - Launch state machine and the sequencer that drives it
//! - Safety shutdown flag
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod ballistics;
pub mod config;
pub mod safety;
pub mod sensor;
pub mod sequencer;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;
