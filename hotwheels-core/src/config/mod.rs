//! Configuration types
//!
//! Board-agnostic configuration structures, read-only once the sequencer
//! has been built.

pub mod calibration;
pub mod limits;
pub mod types;

pub use calibration::*;
pub use limits::*;
pub use types::*;
