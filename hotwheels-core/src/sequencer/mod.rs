//! Launch sequencing
//!
//! Drives the rig through one cycle at a time: set the ramp, wait for the
//! entry gate, release the car, wait for the exit gate, close the door,
//! predict the landing and move the catcher under it.

pub mod cycle;
pub mod launch;
pub mod report;

pub use cycle::{CycleSummary, LaunchCycle};
pub use launch::{CycleOutcome, LaunchSequencer, LoopExit, Rig, HISTORY_LEN};
pub use report::Report;
