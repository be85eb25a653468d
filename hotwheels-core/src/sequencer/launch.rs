//! Launch sequencer
//!
//! Owns the rig and runs the state machine one cycle at a time. Every step
//! is entered through a transition, and every transition first checks the
//! shutdown flag, so an interrupt is honoured at the next safe point:
//! within one poll interval during a sensor wait or the cooldown, and
//! before the next command otherwise.

use embedded_hal::delay::DelayNs;
use heapless::HistoryBuffer;

use crate::ballistics::BallisticPredictor;
use crate::config::SequencerConfig;
use crate::safety::{disable_all, ShutdownFlag, ShutdownReason};
use crate::sensor::{SensorOutcome, SensorTimer};
use crate::state::{Event, LaunchState};
use crate::traits::{
    ActuatorCommand, ActuatorId, AngleSource, BinarySensor, Clock, MotionCommandAdapter,
    MotionError, SensorId,
};

use super::cycle::{CycleSummary, LaunchCycle};
use super::report::Report;

/// Number of completed cycles kept for the run summary
pub const HISTORY_LEN: usize = 8;

/// Hardware the sequencer drives
///
/// Holds the only handles to the sensors. The motion adapter may be shared
/// (for example behind an `Arc`) with a shutdown watcher.
pub struct Rig<M, E, X> {
    /// Ramp, door and catcher drives
    pub motion: M,
    /// Entry photo-gate
    pub entry: E,
    /// Exit photo-gate
    pub exit: X,
}

/// How a single cycle ended
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Catcher positioned and cooldown elapsed
    Completed(CycleSummary),
    /// A sensor wait gave up; no catcher move was issued
    Abandoned(SensorId),
    /// Shutdown observed; drives disabled
    ShutDown,
}

/// Why [`LaunchSequencer::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopExit {
    /// Stop sentinel entered
    Stopped,
    /// Angle source exhausted
    InputClosed,
    /// Shutdown flag raised
    Shutdown,
}

/// Shutdown observed at a transition
struct Interrupted;

type Step<T> = Result<T, Interrupted>;

/// Cycle controller
pub struct LaunchSequencer<'a, M, E, X, C, D> {
    rig: Rig<M, E, X>,
    timer: SensorTimer<C, D>,
    shutdown: &'a ShutdownFlag,
    config: SequencerConfig,
    predictor: BallisticPredictor,
    state: LaunchState,
    stop_requested: bool,
    history: HistoryBuffer<CycleSummary, HISTORY_LEN>,
    cycles_completed: u32,
}

impl<'a, M, E, X, C, D> LaunchSequencer<'a, M, E, X, C, D>
where
    M: MotionCommandAdapter,
    E: BinarySensor,
    X: BinarySensor,
    C: Clock,
    D: DelayNs,
{
    /// Create a sequencer in `Idle`
    ///
    /// `config` is expected to have passed [`SequencerConfig::validate`].
    pub fn new(
        rig: Rig<M, E, X>,
        timer: SensorTimer<C, D>,
        shutdown: &'a ShutdownFlag,
        config: SequencerConfig,
    ) -> Self {
        Self {
            rig,
            timer,
            shutdown,
            predictor: BallisticPredictor::from_config(&config),
            config,
            state: LaunchState::Idle,
            stop_requested: false,
            history: HistoryBuffer::new(),
            cycles_completed: 0,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Whether the stop sentinel has been received
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Most recent completed cycles
    pub fn history(&self) -> &HistoryBuffer<CycleSummary, HISTORY_LEN> {
        &self.history
    }

    /// Total completed cycles, including those rotated out of the history
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// Enable all drives
    ///
    /// Stops at the first drive that refuses. Nothing is enabled once
    /// shutdown has been requested.
    pub fn arm(&mut self) -> Result<(), (ActuatorId, MotionError)> {
        for actuator in ActuatorId::ALL {
            if self.shutdown.is_set() {
                break;
            }
            self.rig
                .motion
                .set_enabled(actuator, true)
                .map_err(|e| (actuator, e))?;
        }
        Ok(())
    }

    /// Pull angles from `input` and run cycles until told to stop
    pub fn run<I, R>(&mut self, input: &mut I, report: &mut R) -> LoopExit
    where
        I: AngleSource + ?Sized,
        R: FnMut(Report),
    {
        loop {
            if self.state.is_terminal() {
                return if self.stop_requested {
                    LoopExit::Stopped
                } else {
                    LoopExit::Shutdown
                };
            }
            if self.shutdown.is_set() {
                self.shut_down(ShutdownReason::Signal, report);
                return LoopExit::Shutdown;
            }

            let Some(requested_deg) = input.next_angle() else {
                if self.shutdown.is_set() {
                    self.shut_down(ShutdownReason::Signal, report);
                    return LoopExit::Shutdown;
                }
                self.shut_down(ShutdownReason::InputClosed, report);
                return LoopExit::InputClosed;
            };

            // Input may have blocked across an interrupt
            if self.shutdown.is_set() {
                self.shut_down(ShutdownReason::Signal, report);
                return LoopExit::Shutdown;
            }

            if self.config.is_stop_request(requested_deg) {
                self.request_stop(report);
                return LoopExit::Stopped;
            }

            if self.run_cycle(requested_deg, report) == CycleOutcome::ShutDown {
                return LoopExit::Shutdown;
            }
        }
    }

    /// Run one launch cycle for a requested ramp angle
    ///
    /// The stop sentinel is never forwarded to the ramp: it stops the
    /// sequencer and reports [`CycleOutcome::ShutDown`].
    pub fn run_cycle<R: FnMut(Report)>(
        &mut self,
        requested_deg: f64,
        report: &mut R,
    ) -> CycleOutcome {
        if self.state.is_terminal() {
            return CycleOutcome::ShutDown;
        }
        if self.config.is_stop_request(requested_deg) {
            self.request_stop(report);
            return CycleOutcome::ShutDown;
        }

        match self.cycle(requested_deg, report) {
            Ok(outcome) => outcome,
            Err(Interrupted) => {
                self.shut_down(ShutdownReason::Signal, report);
                CycleOutcome::ShutDown
            }
        }
    }

    /// Enter `ShuttingDown` and disable every drive
    ///
    /// Safe to call more than once.
    pub fn shut_down<R: FnMut(Report)>(&mut self, reason: ShutdownReason, report: &mut R) {
        let event = match reason {
            ShutdownReason::StopRequested | ShutdownReason::InputClosed
                if self.state == LaunchState::Idle =>
            {
                Event::StopRequested
            }
            _ => Event::ShutdownRequested,
        };
        self.apply(event, report);

        let failures = disable_all(&self.rig.motion);
        for actuator in ActuatorId::ALL {
            match failures.iter().find(|(a, _)| *a == actuator) {
                Some(&(actuator, error)) => report(Report::DisableFailed { actuator, error }),
                None => report(Report::DriveDisabled(actuator)),
            }
        }
    }

    fn request_stop<R: FnMut(Report)>(&mut self, report: &mut R) {
        self.stop_requested = true;
        report(Report::StopRequested);
        self.shut_down(ShutdownReason::StopRequested, report);
    }

    fn cycle<R: FnMut(Report)>(
        &mut self,
        requested_deg: f64,
        report: &mut R,
    ) -> Step<CycleOutcome> {
        let angle = self.config.calibration.ramp_angle(requested_deg);
        let mut cycle = LaunchCycle::new(angle);

        self.enter(Event::CycleRequested, report)?;
        self.issue(ActuatorId::Ramp, angle, report);
        self.issue(ActuatorId::Door, 0.0, report);
        self.enter(Event::RampSet, report)?;

        let Some(entry) = self.await_sensor(SensorId::Entry, report)? else {
            return self.abandon(SensorId::Entry, report);
        };
        cycle.entry_timestamp = Some(entry);
        self.enter(Event::EntryDetected, report)?;
        self.issue(
            ActuatorId::Door,
            self.config.calibration.gate_opening(angle),
            report,
        );
        self.enter(Event::GateOpened, report)?;

        let Some(exit) = self.await_sensor(SensorId::Exit, report)? else {
            return self.abandon(SensorId::Exit, report);
        };
        cycle.exit_timestamp = Some(exit);
        self.enter(Event::ExitDetected, report)?;
        self.issue(ActuatorId::Door, 0.0, report);
        self.enter(Event::GateClosed, report)?;

        let prediction = self.predictor.predict(entry, exit, angle);
        cycle.record_prediction(&prediction);
        report(Report::Prediction {
            angle_deg: angle,
            prediction,
        });
        self.enter(Event::LandingPredicted, report)?;

        self.issue(ActuatorId::Catcher, cycle.landing_position_m, report);
        self.enter(Event::CatcherPositioned, report)?;

        let summary = CycleSummary::new(&cycle, &prediction);
        self.history.write(summary);
        self.cycles_completed = self.cycles_completed.saturating_add(1);

        self.cool_down(report)?;
        Ok(CycleOutcome::Completed(summary))
    }

    /// Close the door, skip prediction and the catcher, settle, go idle
    fn abandon<R: FnMut(Report)>(
        &mut self,
        sensor: SensorId,
        report: &mut R,
    ) -> Step<CycleOutcome> {
        self.issue(ActuatorId::Door, 0.0, report);
        self.enter(Event::WaitAbandoned, report)?;
        self.cool_down(report)?;
        Ok(CycleOutcome::Abandoned(sensor))
    }

    /// Wait for a photo-gate, retrying per the fault policy
    ///
    /// `Ok(None)` means the fault budget ran out.
    fn await_sensor<R: FnMut(Report)>(
        &mut self,
        sensor: SensorId,
        report: &mut R,
    ) -> Step<Option<f64>> {
        let abort = self.shutdown;
        let mut faults = 0u32;

        loop {
            if abort.is_set() {
                return Err(Interrupted);
            }

            let started_at = self.timer.now();
            let outcome = match sensor {
                SensorId::Entry => self.timer.read(&mut self.rig.entry, started_at, abort),
                SensorId::Exit => self.timer.read(&mut self.rig.exit, started_at, abort),
            };

            if self.config.debug_sensors {
                report(Report::SensorSample {
                    sensor,
                    outcome,
                    polls: self.timer.last_polls(),
                });
            }

            if let SensorOutcome::Detected(t) = outcome {
                return Ok(Some(t));
            }
            if outcome.is_fault() {
                faults = faults.saturating_add(1);
                report(Report::SensorFault {
                    sensor,
                    outcome,
                    consecutive: faults,
                });
                if self.config.fault_policy.gives_up_after(faults) {
                    report(Report::WaitAbandoned { sensor, faults });
                    return Ok(None);
                }
            }

            let idle = self.timer.poll_interval_ms();
            self.timer.pause_ms(idle);
        }
    }

    /// Settle in poll-sized slices so shutdown is seen promptly
    fn cool_down<R: FnMut(Report)>(&mut self, report: &mut R) -> Step<()> {
        let slice = self.timer.poll_interval_ms().max(1);
        let mut remaining = self.config.cooldown_ms;

        while remaining > 0 {
            if self.shutdown.is_set() {
                return Err(Interrupted);
            }
            let step = remaining.min(slice);
            self.timer.pause_ms(step);
            remaining -= step;
        }

        self.enter(Event::CooldownElapsed, report)
    }

    /// Take a transition unless shutdown has been requested
    fn enter<R: FnMut(Report)>(&mut self, event: Event, report: &mut R) -> Step<()> {
        if self.shutdown.is_set() {
            return Err(Interrupted);
        }
        self.apply(event, report);
        Ok(())
    }

    fn apply<R: FnMut(Report)>(&mut self, event: Event, report: &mut R) {
        let from = self.state;
        let to = from.transition(event);
        if to != from {
            self.state = to;
            report(Report::Transition { from, to, event });
        }
    }

    /// Hand a move to the adapter; failures are reported, not fatal
    fn issue<R: FnMut(Report)>(&self, actuator: ActuatorId, target: f64, report: &mut R) {
        if self.shutdown.is_set() {
            return;
        }
        let command = ActuatorCommand::new(actuator, target, self.config.profiles.get(actuator));
        match self.rig.motion.move_to(&command) {
            Ok(()) => report(Report::MoveIssued(command)),
            Err(error) => report(Report::MoveFailed {
                actuator,
                target,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorFaultPolicy;
    use crate::mock::{Call, FakeClock, RecordingMotion, ScriptedSensor};

    type TestSequencer<'a> = LaunchSequencer<
        'a,
        &'a RecordingMotion,
        ScriptedSensor<'a>,
        ScriptedSensor<'a>,
        FakeClock,
        FakeClock,
    >;

    fn sequencer<'a>(
        motion: &'a RecordingMotion,
        entry: ScriptedSensor<'a>,
        exit: ScriptedSensor<'a>,
        clock: &FakeClock,
        flag: &'a ShutdownFlag,
        config: SequencerConfig,
    ) -> TestSequencer<'a> {
        let timer = SensorTimer::from_limits(clock.clone(), clock.clone(), &config.limits);
        LaunchSequencer::new(
            Rig {
                motion,
                entry,
                exit,
            },
            timer,
            flag,
            config,
        )
    }

    fn sink(reports: &mut Vec<Report>) -> impl FnMut(Report) + '_ {
        move |r| reports.push(r)
    }

    fn visited(reports: &[Report]) -> Vec<LaunchState> {
        reports
            .iter()
            .filter_map(|r| match r {
                Report::Transition { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_cycle() {
        let clock = FakeClock::starting_at(10.0);
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 10.0);
        let exit = ScriptedSensor::fires_at(&clock, 10.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        let CycleOutcome::Completed(summary) = outcome else {
            panic!("cycle did not complete: {:?}", outcome);
        };
        assert!((summary.speed_m_s - 2.0).abs() < 1e-6, "speed {}", summary.speed_m_s);
        assert!((summary.landing_m - 0.591103).abs() < 1e-5, "landing {}", summary.landing_m);
        assert_eq!(seq.state(), LaunchState::Idle);

        assert_eq!(motion.targets(ActuatorId::Ramp), vec![30.0]);
        assert_eq!(motion.targets(ActuatorId::Door), vec![0.0, 70.0, 0.0]);
        let catcher = motion.targets(ActuatorId::Catcher);
        assert_eq!(catcher.len(), 1);
        assert!((catcher[0] - 0.591103).abs() < 1e-5);

        assert_eq!(
            visited(&reports),
            vec![
                LaunchState::SettingRamp,
                LaunchState::WaitingEntry,
                LaunchState::OpeningGate,
                LaunchState::WaitingExit,
                LaunchState::ClosingGate,
                LaunchState::Predicting,
                LaunchState::PositioningCatcher,
                LaunchState::Cooldown,
                LaunchState::Idle,
            ]
        );
        assert_eq!(seq.history().len(), 1);
        assert_eq!(seq.cycles_completed(), 1);
    }

    #[test]
    fn test_catcher_never_moves_before_both_gates() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        seq.run_cycle(30.0, &mut sink(&mut reports));

        let calls = motion.calls();
        let catcher_at = calls
            .iter()
            .position(|c| matches!(c, Call::Move(cmd) if cmd.actuator == ActuatorId::Catcher))
            .expect("catcher moved");
        let door_moves = calls[..catcher_at]
            .iter()
            .filter(|c| matches!(c, Call::Move(cmd) if cmd.actuator == ActuatorId::Door))
            .count();
        assert_eq!(door_moves, 3);
    }

    #[test]
    fn test_landing_clamped_to_rail() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        // 0.1 m in 5 ms: 20 m/s lands far beyond the rail
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0045);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(45.0, &mut sink(&mut reports));

        let CycleOutcome::Completed(summary) = outcome else {
            panic!("cycle did not complete");
        };
        assert!(summary.was_clamped());
        assert_eq!(motion.targets(ActuatorId::Catcher), vec![0.84]);
    }

    #[test]
    fn test_timeout_then_detection_completes() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 7.0);
        let exit = ScriptedSensor::fires_at(&clock, 7.1);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        assert!(matches!(outcome, CycleOutcome::Completed(_)));
        let faults: Vec<_> = reports
            .iter()
            .filter_map(|r| match r {
                Report::SensorFault {
                    sensor, outcome, ..
                } => Some((*sensor, *outcome)),
                _ => None,
            })
            .collect();
        assert_eq!(faults, vec![(SensorId::Entry, SensorOutcome::TimedOut)]);
        assert_eq!(motion.targets(ActuatorId::Catcher).len(), 1);
    }

    #[test]
    fn test_read_errors_retried_forever_by_default() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0).faulting_until(0.01);
        let exit = ScriptedSensor::fires_at(&clock, 0.06);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        assert!(matches!(outcome, CycleOutcome::Completed(_)));
        let read_errors = reports
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Report::SensorFault {
                        outcome: SensorOutcome::ReadError,
                        ..
                    }
                )
            })
            .count();
        assert!(read_errors >= 9, "saw {read_errors} read errors");
    }

    #[test]
    fn test_shutdown_while_waiting_for_exit() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::never(&clock).raising_at(&flag, 1.0);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());
        seq.arm().expect("arm");

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        assert_eq!(outcome, CycleOutcome::ShutDown);
        assert_eq!(seq.state(), LaunchState::ShuttingDown);
        assert!(clock.now() < 1.01, "shutdown took until {}", clock.now());

        assert!(motion.targets(ActuatorId::Catcher).is_empty());
        assert_eq!(motion.targets(ActuatorId::Door), vec![0.0, 70.0]);
        for actuator in ActuatorId::ALL {
            assert!(!motion.is_enabled(actuator));
        }

        let states = visited(&reports);
        assert!(!states.contains(&LaunchState::Predicting));
        assert!(!states.contains(&LaunchState::PositioningCatcher));
        assert_eq!(states.last(), Some(&LaunchState::ShuttingDown));
        assert_eq!(seq.history().len(), 0);
    }

    #[test]
    fn test_no_commands_after_shutdown() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.05);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());
        flag.trigger();

        let mut reports = Vec::new();
        assert_eq!(seq.run_cycle(30.0, &mut sink(&mut reports)), CycleOutcome::ShutDown);
        assert_eq!(seq.arm(), Ok(()));

        assert!(motion
            .calls()
            .iter()
            .all(|c| matches!(c, Call::Enable(_, false))));
        assert_eq!(seq.run_cycle(30.0, &mut sink(&mut reports)), CycleOutcome::ShutDown);
    }

    #[test]
    fn test_sentinel_stops_loop() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());
        seq.arm().expect("arm");

        let mut input = vec![30.0, 1.23, 45.0].into_iter();
        let mut reports = Vec::new();
        let exit = seq.run(&mut input, &mut sink(&mut reports));

        assert_eq!(exit, LoopExit::Stopped);
        assert!(seq.stop_requested());
        assert_eq!(seq.state(), LaunchState::ShuttingDown);
        assert_eq!(motion.targets(ActuatorId::Ramp), vec![30.0]);
        assert_eq!(input.next(), Some(45.0));
        assert!(reports.contains(&Report::StopRequested));
        for actuator in ActuatorId::ALL {
            assert!(!motion.is_enabled(actuator));
            assert!(reports.contains(&Report::DriveDisabled(actuator)));
        }
        assert_eq!(seq.cycles_completed(), 1);
    }

    #[test]
    fn test_sentinel_never_reaches_ramp() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.05);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        assert_eq!(seq.run_cycle(1.23, &mut sink(&mut reports)), CycleOutcome::ShutDown);
        assert!(seq.stop_requested());
        assert!(motion.targets(ActuatorId::Ramp).is_empty());
    }

    #[test]
    fn test_input_closed() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut input = core::iter::empty::<f64>();
        let mut reports = Vec::new();
        assert_eq!(seq.run(&mut input, &mut sink(&mut reports)), LoopExit::InputClosed);
        assert!(!seq.stop_requested());
        assert_eq!(seq.state(), LaunchState::ShuttingDown);
    }

    #[test]
    fn test_shutdown_between_cycles() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        // Interrupt arrives while the prompt is blocked
        let mut input = vec![30.0].into_iter().inspect(|_| {
            flag.trigger();
        });
        let mut reports = Vec::new();
        assert_eq!(seq.run(&mut input, &mut sink(&mut reports)), LoopExit::Shutdown);
        assert!(motion.targets(ActuatorId::Ramp).is_empty());
        assert_eq!(seq.state(), LaunchState::ShuttingDown);
    }

    #[test]
    fn test_move_failure_does_not_abort_cycle() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        motion.fail_move(ActuatorId::Ramp, MotionError::Fault);
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        assert!(matches!(outcome, CycleOutcome::Completed(_)));
        assert!(reports.contains(&Report::MoveFailed {
            actuator: ActuatorId::Ramp,
            target: 30.0,
            error: MotionError::Fault,
        }));
        assert_eq!(motion.targets(ActuatorId::Catcher).len(), 1);
    }

    #[test]
    fn test_abandon_policy_skips_catcher() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::never(&clock);
        let exit = ScriptedSensor::never(&clock);
        let config = SequencerConfig {
            fault_policy: SensorFaultPolicy::Abandon {
                max_consecutive_faults: 2,
            },
            ..Default::default()
        };
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, config);

        let mut reports = Vec::new();
        let outcome = seq.run_cycle(30.0, &mut sink(&mut reports));

        assert_eq!(outcome, CycleOutcome::Abandoned(SensorId::Entry));
        assert_eq!(seq.state(), LaunchState::Idle);
        assert!(motion.targets(ActuatorId::Catcher).is_empty());
        assert_eq!(motion.targets(ActuatorId::Door), vec![0.0, 0.0]);
        assert!(reports.contains(&Report::WaitAbandoned {
            sensor: SensorId::Entry,
            faults: 2,
        }));
        assert!(!visited(&reports).contains(&LaunchState::Predicting));
        assert_eq!(seq.history().len(), 0);
    }

    #[test]
    fn test_calibration_offset_applied_once() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let mut config = SequencerConfig::default();
        config.calibration.offset_deg = 2.5;
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, config);

        let mut reports = Vec::new();
        seq.run_cycle(30.0, &mut sink(&mut reports));

        assert_eq!(motion.targets(ActuatorId::Ramp), vec![27.5]);
        assert_eq!(motion.targets(ActuatorId::Door), vec![0.0, 72.5, 0.0]);
    }

    #[test]
    fn test_debug_sampling_reports_polls() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0495);
        let config = SequencerConfig {
            debug_sensors: true,
            ..Default::default()
        };
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, config);

        let mut reports = Vec::new();
        seq.run_cycle(30.0, &mut sink(&mut reports));

        let samples: Vec<_> = reports
            .iter()
            .filter_map(|r| match r {
                Report::SensorSample { sensor, polls, .. } => Some((*sensor, *polls)),
                _ => None,
            })
            .collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], (SensorId::Entry, 1));
        assert_eq!(samples[1].0, SensorId::Exit);
        assert!(samples[1].1 >= 50);
    }

    #[test]
    fn test_arm_enables_all_drives() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::never(&clock);
        let exit = ScriptedSensor::never(&clock);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        assert_eq!(seq.arm(), Ok(()));
        for actuator in ActuatorId::ALL {
            assert!(motion.is_enabled(actuator));
        }
    }

    #[test]
    fn test_arm_reports_refusing_drive() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        motion.fail_enable(ActuatorId::Door, MotionError::NotReady);
        let entry = ScriptedSensor::never(&clock);
        let exit = ScriptedSensor::never(&clock);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        assert_eq!(seq.arm(), Err((ActuatorId::Door, MotionError::NotReady)));
        assert!(!motion.is_enabled(ActuatorId::Catcher));
    }

    #[test]
    fn test_history_keeps_recent_cycles() {
        let clock = FakeClock::new();
        let flag = ShutdownFlag::new();
        let motion = RecordingMotion::new();
        let entry = ScriptedSensor::fires_at(&clock, 0.0);
        let exit = ScriptedSensor::fires_at(&clock, 0.0);
        let mut seq = sequencer(&motion, entry, exit, &clock, &flag, SequencerConfig::default());

        let mut input = (0..10).map(|i| 20.0 + f64::from(i)).collect::<Vec<_>>().into_iter();
        let mut reports = Vec::new();
        assert_eq!(seq.run(&mut input, &mut sink(&mut reports)), LoopExit::InputClosed);

        assert_eq!(seq.cycles_completed(), 10);
        assert_eq!(seq.history().len(), HISTORY_LEN);
        assert_eq!(seq.history().recent().map(|s| s.ramp_angle_deg), Some(29.0));
    }
}
