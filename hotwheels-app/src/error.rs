//! Setup errors
//!
//! Anything that goes wrong before the first cycle is fatal: the rig is
//! never driven with a configuration or backend it could not fully set up.

use std::io;
use std::path::PathBuf;

use hotwheels_core::config::ConfigError;
use hotwheels_core::traits::MotionError;
use thiserror::Error;

/// Unrecoverable startup failure
#[derive(Debug, Error)]
pub enum SetupError {
    /// Config file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// Sequencer settings rejected
    #[error("invalid sequencer configuration: {0:?}")]
    InvalidConfig(ConfigError),

    /// Bench simulation settings rejected
    #[error("invalid simulation configuration: {0}")]
    InvalidSim(&'static str),

    /// A drive refused to enable
    #[error("failed to arm {actuator} drive: {error:?}")]
    Arm {
        actuator: &'static str,
        error: MotionError,
    },

    /// Async runtime could not start
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}
