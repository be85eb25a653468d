//! Events that trigger launch state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Cycle progress
    /// Operator supplied a ramp angle
    CycleRequested,
    /// Ramp and door commands issued
    RampSet,
    /// Entry photo-gate fired
    EntryDetected,
    /// Door opening command issued
    GateOpened,
    /// Exit photo-gate fired
    ExitDetected,
    /// Door closing command issued
    GateClosed,
    /// Landing position computed and clamped
    LandingPredicted,
    /// Catcher command issued
    CatcherPositioned,
    /// Settle delay over
    CooldownElapsed,

    // Faults
    /// A sensor wait exhausted its fault budget
    WaitAbandoned,

    // Stop and safety
    /// Stop sentinel entered or input closed
    StopRequested,
    /// Interrupt signal observed
    ShutdownRequested,
}
