//! Launch state machine definition
//!
//! Every actuator command and sensor wait the sequencer performs is a
//! function of the current state. Transitions are explicit and
//! deterministic; unknown (state, event) pairs leave the state unchanged.

use super::events::Event;

/// Launch cycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaunchState {
    /// Waiting for the next ramp angle
    Idle,
    /// Ramp moving to angle, door closing
    SettingRamp,
    /// Polling the entry photo-gate
    WaitingEntry,
    /// Door opening to release the car
    OpeningGate,
    /// Polling the exit photo-gate
    WaitingExit,
    /// Door closing behind the car
    ClosingGate,
    /// Computing the landing position
    Predicting,
    /// Catcher moving to the landing position
    PositioningCatcher,
    /// Mechanisms settling before the next cycle
    Cooldown,
    /// Drives disabled, loop exiting (terminal)
    ShuttingDown,
}

impl LaunchState {
    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LaunchState::ShuttingDown)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use LaunchState::*;

        match (self, event) {
            // Shutdown wins from anywhere and is never left
            (ShuttingDown, _) => ShuttingDown,
            (_, ShutdownRequested) => ShuttingDown,

            // Stop is only honoured between cycles
            (Idle, StopRequested) => ShuttingDown,

            // Normal cycle
            (Idle, CycleRequested) => SettingRamp,
            (SettingRamp, RampSet) => WaitingEntry,
            (WaitingEntry, EntryDetected) => OpeningGate,
            (OpeningGate, GateOpened) => WaitingExit,
            (WaitingExit, ExitDetected) => ClosingGate,
            (ClosingGate, GateClosed) => Predicting,
            (Predicting, LandingPredicted) => PositioningCatcher,
            (PositioningCatcher, CatcherPositioned) => Cooldown,
            (Cooldown, CooldownElapsed) => Idle,

            // Sensor gave up: no prediction, no catcher move
            (WaitingEntry, WaitAbandoned) => Cooldown,
            (WaitingExit, WaitAbandoned) => Cooldown,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let sequence = [
            (Event::CycleRequested, LaunchState::SettingRamp),
            (Event::RampSet, LaunchState::WaitingEntry),
            (Event::EntryDetected, LaunchState::OpeningGate),
            (Event::GateOpened, LaunchState::WaitingExit),
            (Event::ExitDetected, LaunchState::ClosingGate),
            (Event::GateClosed, LaunchState::Predicting),
            (Event::LandingPredicted, LaunchState::PositioningCatcher),
            (Event::CatcherPositioned, LaunchState::Cooldown),
            (Event::CooldownElapsed, LaunchState::Idle),
        ];

        let mut state = LaunchState::Idle;
        for (event, expected) in sequence {
            state = state.transition(event);
            assert_eq!(state, expected, "after {:?}", event);
        }
    }

    #[test]
    fn test_shutdown_from_any_state() {
        let states = [
            LaunchState::Idle,
            LaunchState::SettingRamp,
            LaunchState::WaitingEntry,
            LaunchState::OpeningGate,
            LaunchState::WaitingExit,
            LaunchState::ClosingGate,
            LaunchState::Predicting,
            LaunchState::PositioningCatcher,
            LaunchState::Cooldown,
        ];

        for state in states {
            let next = state.transition(Event::ShutdownRequested);
            assert_eq!(next, LaunchState::ShuttingDown, "from {:?}", state);
        }
    }

    #[test]
    fn test_shutting_down_is_terminal() {
        let state = LaunchState::ShuttingDown;
        assert!(state.is_terminal());
        assert_eq!(state.transition(Event::CycleRequested), state);
        assert_eq!(state.transition(Event::CooldownElapsed), state);
    }

    #[test]
    fn test_stop_only_from_idle() {
        assert_eq!(
            LaunchState::Idle.transition(Event::StopRequested),
            LaunchState::ShuttingDown
        );
        assert_eq!(
            LaunchState::WaitingExit.transition(Event::StopRequested),
            LaunchState::WaitingExit
        );
    }

    #[test]
    fn test_abandoned_wait_skips_prediction() {
        assert_eq!(
            LaunchState::WaitingEntry.transition(Event::WaitAbandoned),
            LaunchState::Cooldown
        );
        assert_eq!(
            LaunchState::WaitingExit.transition(Event::WaitAbandoned),
            LaunchState::Cooldown
        );
        // Abandon means nothing outside a wait
        assert_eq!(
            LaunchState::Predicting.transition(Event::WaitAbandoned),
            LaunchState::Predicting
        );
    }

    #[test]
    fn test_out_of_order_events_ignored() {
        assert_eq!(
            LaunchState::Idle.transition(Event::ExitDetected),
            LaunchState::Idle
        );
        assert_eq!(
            LaunchState::WaitingEntry.transition(Event::ExitDetected),
            LaunchState::WaitingEntry
        );
    }
}
