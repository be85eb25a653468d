//! Safety shutdown
//!
//! Shutdown flag shared with the interrupt watcher and the drive-disable
//! routine both paths use.

pub mod shutdown;

pub use shutdown::{disable_all, DisableFailures, ShutdownFlag, ShutdownReason};
