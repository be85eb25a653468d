//! Safety shutdown
//!
//! The interrupt path raises a lock-free flag; the control loop checks it at
//! every state transition. Disabling the drives is idempotent so the
//! watcher's immediate disable and the loop's own cleanup may overlap.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;

use crate::traits::{ActuatorId, MotionCommandAdapter, MotionError};

/// Why the loop is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownReason {
    /// Interrupt signal from the operator
    Signal,
    /// Stop sentinel entered at the prompt
    StopRequested,
    /// Angle input closed
    InputClosed,
}

/// Process-wide shutdown request
///
/// Safe to place in a `static` and to trigger from any thread.
#[derive(Debug, Default)]
pub struct ShutdownFlag {
    raised: AtomicBool,
}

impl ShutdownFlag {
    /// Create a lowered flag
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag
    ///
    /// Returns `true` if this call raised it, `false` if it was already up.
    pub fn trigger(&self) -> bool {
        !self.raised.swap(true, Ordering::SeqCst)
    }

    /// Check whether shutdown has been requested
    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Drives that refused to disable
pub type DisableFailures = Vec<(ActuatorId, MotionError), 3>;

/// Disable every drive, continuing past individual failures
pub fn disable_all<M: MotionCommandAdapter + ?Sized>(motion: &M) -> DisableFailures {
    let mut failures = DisableFailures::new();
    for actuator in ActuatorId::ALL {
        if let Err(e) = motion.set_enabled(actuator, false) {
            // Capacity equals ActuatorId::ALL, push cannot overflow
            let _ = failures.push((actuator, e));
        }
    }
    failures
}
