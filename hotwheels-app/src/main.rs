//! Hotwheels - Ramp Launch Rig Controller
//!
//! Host binary: loads the rig configuration, builds the bench backend,
//! arms the drives and runs launch cycles for angles typed at the prompt.
//! Ctrl-C disables every drive and ends the loop.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::ExitCode;
use std::task::Poll;
use std::time::Duration;

use clap::Parser;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use hotwheels_core::safety::{disable_all, ShutdownFlag};
use hotwheels_core::sensor::SensorTimer;
use hotwheels_core::sequencer::{LaunchSequencer, Report, Rig};
use hotwheels_core::traits::{ActuatorId, AngleSource, SensorId};
use hotwheels_drivers::sensor::PhotoGate;

mod clock;
mod config;
mod error;
mod prompt;
mod sim;
mod telemetry;

use crate::clock::{MonotonicClock, ThreadDelay};
use crate::config::AppConfig;
use crate::error::SetupError;
use crate::prompt::AnglePrompt;
use crate::sim::{SimBench, SimMotion, SimPin};
use crate::telemetry::RunSummary;

/// Raised by the interrupt watcher, observed by the control loop
static SHUTDOWN: ShutdownFlag = ShutdownFlag::new();

/// How long the watcher waits for the loop to notice an interrupt
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

type Sequencer = LaunchSequencer<
    'static,
    SimMotion<MonotonicClock>,
    PhotoGate<SimPin<MonotonicClock>>,
    PhotoGate<SimPin<MonotonicClock>>,
    MonotonicClock,
    ThreadDelay,
>;

/// Pending Ctrl-C, already registered with the runtime
type Interrupt = Pin<Box<dyn Future<Output = io::Result<()>>>>;

/// Ramp launch rig controller
#[derive(Debug, Parser)]
#[command(name = "hotwheels")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the embedded hotwheels.toml)
    #[arg(long, env = "HOTWHEELS_CONFIG")]
    config: Option<PathBuf>,

    /// Log every sensor read with its poll count (debug level)
    #[arg(long)]
    debug_sensors: bool,
}

fn main() -> ExitCode {
    telemetry::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, SetupError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.debug_sensors {
        config.sequencer.debug_sensors = true;
    }

    let (sequencer, watcher) = build_rig(&config, &SHUTDOWN);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SetupError::Runtime)?;

    let result = runtime.block_on(start(sequencer, watcher, &SHUTDOWN));

    // The control thread may still be parked on stdin
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Bench backend, photo-gates and the sequencer that owns them
fn build_rig(
    config: &AppConfig,
    shutdown: &'static ShutdownFlag,
) -> (Sequencer, SimMotion<MonotonicClock>) {
    let clock = MonotonicClock::new();
    let bench = SimBench::new(&config.sim, &config.sequencer, clock);

    let gate = config.sensors.photogate();
    let entry = PhotoGate::new(bench.pin(SensorId::Entry, gate.active), gate);
    let exit = PhotoGate::new(bench.pin(SensorId::Exit, gate.active), gate);

    let motion = bench.motion();
    let watcher = motion.clone();

    let timer = SensorTimer::from_limits(clock, ThreadDelay, &config.sequencer.limits);
    let sequencer = LaunchSequencer::new(
        Rig {
            motion,
            entry,
            exit,
        },
        timer,
        shutdown,
        config.sequencer,
    );
    (sequencer, watcher)
}

/// Listen for Ctrl-C, arm the drives, then supervise the control loop
async fn start(
    mut sequencer: Sequencer,
    watcher: SimMotion<MonotonicClock>,
    shutdown: &'static ShutdownFlag,
) -> Result<ExitCode, SetupError> {
    let Some(interrupt) = listen_for_interrupt().await else {
        warn!("interrupted before arming");
        return Ok(ExitCode::SUCCESS);
    };

    if let Err((actuator, error)) = sequencer.arm() {
        telemetry::log_disable(&disable_all(&watcher));
        return Err(SetupError::Arm {
            actuator: actuator.name(),
            error,
        });
    }
    info!("drives armed");

    Ok(supervise(sequencer, watcher, interrupt, shutdown).await)
}

/// Install the Ctrl-C handler now rather than at the first `select!`
///
/// Returns `None` if the interrupt has already arrived.
async fn listen_for_interrupt() -> Option<Interrupt> {
    let mut interrupt: Interrupt = Box::pin(tokio::signal::ctrl_c());

    // The handler is registered by the first poll
    let first = std::future::poll_fn(|cx| Poll::Ready(interrupt.as_mut().poll(cx))).await;
    match first {
        Poll::Pending => Some(interrupt),
        Poll::Ready(Ok(())) => None,
        Poll::Ready(Err(e)) => {
            warn!(error = %e, "cannot listen for interrupts");
            Some(Box::pin(std::future::pending()))
        }
    }
}

/// Run the control loop on a blocking thread and watch for Ctrl-C
async fn supervise(
    mut sequencer: Sequencer,
    watcher: SimMotion<MonotonicClock>,
    interrupt: Interrupt,
    shutdown: &'static ShutdownFlag,
) -> ExitCode {
    let mut control = tokio::task::spawn_blocking(move || {
        let mut prompt = AnglePrompt::stdin();
        control_loop(&mut sequencer, &mut prompt)
    });

    let signal = tokio::select! {
        result = &mut control => return finish(result, &watcher, shutdown),
        signal = interrupt => signal,
    };

    if let Err(e) = signal {
        warn!(error = %e, "cannot listen for interrupts");
        return finish(control.await, &watcher, shutdown);
    }

    match interrupt_control(control, &watcher, shutdown).await {
        Some(result) => finish(result, &watcher, shutdown),
        None => {
            info!("control loop waiting on input, exiting");
            ExitCode::SUCCESS
        }
    }
}

/// Run cycles for every angle `input` yields and summarize the run
fn control_loop<I>(sequencer: &mut Sequencer, input: &mut I) -> RunSummary
where
    I: AngleSource + ?Sized,
{
    let mut faults = 0u32;
    let exit = sequencer.run(input, &mut |report: Report| {
        if report.is_fault() {
            faults = faults.saturating_add(1);
        }
        telemetry::log_report(report);
    });

    RunSummary {
        exit,
        cycles: sequencer.cycles_completed(),
        faults,
        recent: sequencer.history().oldest_ordered().copied().collect(),
    }
}

/// Raise the flag, disable every drive and give the loop a grace period
///
/// `None` if the loop has still not returned, usually because it is
/// blocked on stdin.
async fn interrupt_control<F>(
    control: F,
    watcher: &SimMotion<MonotonicClock>,
    shutdown: &ShutdownFlag,
) -> Option<Result<RunSummary, JoinError>>
where
    F: Future<Output = Result<RunSummary, JoinError>>,
{
    if shutdown.trigger() {
        warn!("interrupt received, disabling drives");
    }
    telemetry::log_disable(&disable_all(watcher));

    tokio::time::timeout(SHUTDOWN_GRACE, control).await.ok()
}

/// Turn the control thread's result into an exit code
fn finish(
    result: Result<RunSummary, JoinError>,
    watcher: &SimMotion<MonotonicClock>,
    shutdown: &ShutdownFlag,
) -> ExitCode {
    match result {
        Ok(summary) => {
            summary.log();
            log_axes(watcher);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "control loop crashed");
            shutdown.trigger();
            telemetry::log_disable(&disable_all(watcher));
            ExitCode::FAILURE
        }
    }
}

/// Final state of the simulated axes
fn log_axes(motion: &SimMotion<MonotonicClock>) {
    for actuator in ActuatorId::ALL {
        if let Some(axis) = motion.axis(actuator) {
            debug!(
                axis = actuator.name(),
                enabled = axis.enabled,
                target = axis.target,
                moves = axis.moves,
                "final axis state"
            );
        }
    }
}
