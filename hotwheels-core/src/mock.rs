//! Test doubles for the hardware traits
//!
//! A shared fake clock whose delay advances time, scripted photo-gates and
//! a motion adapter that records every call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::safety::ShutdownFlag;
use crate::traits::{
    ActuatorCommand, ActuatorId, BinarySensor, Clock, MotionCommandAdapter, MotionError,
};

/// Simulated time, advanced only by delays
#[derive(Debug, Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<f64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: f64) -> Self {
        let clock = Self::new();
        clock.now.set(t);
        clock
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(f64::from(ns) * 1e-9);
    }

    fn delay_us(&mut self, us: u32) {
        self.advance(f64::from(us) * 1e-6);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(f64::from(ms) * 1e-3);
    }
}

/// Photo-gate driven by the fake clock
pub struct ScriptedSensor<'a> {
    clock: FakeClock,
    fires_at: Option<f64>,
    faults_until: f64,
    raise: Option<(&'a ShutdownFlag, f64)>,
}

impl<'a> ScriptedSensor<'a> {
    fn with(clock: &FakeClock, fires_at: Option<f64>, faults_until: f64) -> Self {
        Self {
            clock: clock.clone(),
            fires_at,
            faults_until,
            raise: None,
        }
    }

    /// Fires once the clock reaches `t`
    pub fn fires_at(clock: &FakeClock, t: f64) -> Self {
        Self::with(clock, Some(t), f64::NEG_INFINITY)
    }

    /// Never fires
    pub fn never(clock: &FakeClock) -> Self {
        Self::with(clock, None, f64::NEG_INFINITY)
    }

    /// Every read faults
    pub fn faulty(clock: &FakeClock) -> Self {
        Self::with(clock, None, f64::INFINITY)
    }

    /// Reads fault until the clock reaches `t`
    pub fn faulting_until(mut self, t: f64) -> Self {
        self.faults_until = t;
        self
    }

    /// Raise `flag` from inside a read once the clock reaches `t`
    pub fn raising_at(mut self, flag: &'a ShutdownFlag, t: f64) -> Self {
        self.raise = Some((flag, t));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFault;

impl BinarySensor for ScriptedSensor<'_> {
    type Error = ReadFault;

    fn is_triggered(&mut self) -> Result<bool, Self::Error> {
        let now = self.clock.now();

        if let Some((flag, at)) = self.raise {
            if now >= at {
                flag.trigger();
            }
        }
        if now < self.faults_until {
            return Err(ReadFault);
        }
        Ok(self.fires_at.is_some_and(|t| now >= t))
    }
}

/// One adapter call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    Move(ActuatorCommand),
    Enable(ActuatorId, bool),
}

/// Motion adapter that records calls and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingMotion {
    calls: RefCell<Vec<Call>>,
    enabled: Cell<[bool; 3]>,
    move_failures: RefCell<Vec<(ActuatorId, MotionError)>>,
    enable_failures: RefCell<Vec<(ActuatorId, MotionError)>>,
}

fn index(actuator: ActuatorId) -> usize {
    match actuator {
        ActuatorId::Ramp => 0,
        ActuatorId::Door => 1,
        ActuatorId::Catcher => 2,
    }
}

impl RecordingMotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_move(&self, actuator: ActuatorId, error: MotionError) {
        self.move_failures.borrow_mut().push((actuator, error));
    }

    pub fn fail_enable(&self, actuator: ActuatorId, error: MotionError) {
        self.enable_failures.borrow_mut().push((actuator, error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Targets of all moves issued to one actuator, in order
    pub fn targets(&self, actuator: ActuatorId) -> Vec<f64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Move(cmd) if cmd.actuator == actuator => Some(cmd.target),
                _ => None,
            })
            .collect()
    }

    pub fn is_enabled(&self, actuator: ActuatorId) -> bool {
        self.enabled.get()[index(actuator)]
    }
}

impl MotionCommandAdapter for RecordingMotion {
    fn move_to(&self, command: &ActuatorCommand) -> Result<(), MotionError> {
        self.calls.borrow_mut().push(Call::Move(*command));
        let failure = self
            .move_failures
            .borrow()
            .iter()
            .find(|(a, _)| *a == command.actuator)
            .map(|(_, e)| *e);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn set_enabled(&self, actuator: ActuatorId, enabled: bool) -> Result<(), MotionError> {
        self.calls.borrow_mut().push(Call::Enable(actuator, enabled));
        let failure = self
            .enable_failures
            .borrow()
            .iter()
            .find(|(a, _)| *a == actuator)
            .map(|(_, e)| *e);
        if let Some(e) = failure {
            return Err(e);
        }
        let mut state = self.enabled.get();
        state[index(actuator)] = enabled;
        self.enabled.set(state);
        Ok(())
    }
}
