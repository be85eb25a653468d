//! Console telemetry
//!
//! Maps sequencer reports onto tracing events and prints the run summary.

use hotwheels_core::safety::DisableFailures;
use hotwheels_core::sequencer::{CycleSummary, LoopExit, Report};
use hotwheels_core::sensor::SensorOutcome;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber; `RUST_LOG` overrides the default `info`
pub fn init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Report sink handed to the sequencer
pub fn log_report(report: Report) {
    match report {
        Report::Transition { from, to, event } => {
            info!(?from, ?to, ?event, "state");
        }
        Report::MoveIssued(cmd) => {
            info!(axis = cmd.actuator.name(), target = cmd.target, "move");
        }
        Report::MoveFailed {
            actuator,
            target,
            error,
        } => {
            warn!(axis = actuator.name(), target, ?error, "move rejected");
        }
        Report::SensorFault {
            sensor,
            outcome,
            consecutive,
        } => match outcome {
            SensorOutcome::TimedOut => {
                warn!(sensor = sensor.name(), consecutive, "sensor wait timed out, retrying");
            }
            _ => warn!(sensor = sensor.name(), consecutive, ?outcome, "sensor read failed"),
        },
        Report::SensorSample {
            sensor,
            outcome,
            polls,
        } => {
            debug!(sensor = sensor.name(), ?outcome, polls, "sensor read");
        }
        Report::Prediction {
            angle_deg,
            prediction,
        } => {
            info!(
                angle_deg,
                speed_m_s = prediction.speed_m_s,
                landing_m = prediction.landing_m,
                "predicted landing"
            );
            if prediction.was_clamped() {
                warn!(
                    raw_m = prediction.raw_landing_m,
                    "landing outside catcher travel, clamped"
                );
            }
        }
        Report::WaitAbandoned { sensor, faults } => {
            warn!(sensor = sensor.name(), faults, "giving up on sensor, cycle abandoned");
        }
        Report::DriveDisabled(actuator) => {
            info!(axis = actuator.name(), "drive disabled");
        }
        Report::DisableFailed { actuator, error } => {
            warn!(axis = actuator.name(), ?error, "drive refused to disable");
        }
        Report::StopRequested => info!("stop requested"),
    }
}

/// Log the outcome of a best-effort disable
pub fn log_disable(failures: &DisableFailures) {
    if failures.is_empty() {
        info!("all drives disabled");
    }
    for (actuator, error) in failures {
        warn!(axis = actuator.name(), ?error, "drive refused to disable");
    }
}

/// What the control loop hands back when it ends
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub exit: LoopExit,
    pub cycles: u32,
    /// Fault reports seen during the run
    pub faults: u32,
    /// Oldest first
    pub recent: Vec<CycleSummary>,
}

impl RunSummary {
    pub fn log(&self) {
        let reason = match self.exit {
            LoopExit::Stopped => "stop requested",
            LoopExit::InputClosed => "input closed",
            LoopExit::Shutdown => "interrupted",
        };
        info!(cycles = self.cycles, faults = self.faults, reason, "run finished");

        for (i, cycle) in self.recent.iter().enumerate() {
            info!(
                n = i + 1,
                angle_deg = cycle.ramp_angle_deg,
                speed_m_s = cycle.speed_m_s,
                landing_m = cycle.landing_m,
                clamped = cycle.was_clamped(),
                "recent launch"
            );
        }
    }
}
