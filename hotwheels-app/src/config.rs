//! Configuration loading
//!
//! The default configuration is embedded at build time from hotwheels.toml.
//! A file given on the command line replaces it entirely; keys it omits
//! take the built-in defaults.

use std::fs;
use std::path::Path;

use hotwheels_core::config::SequencerConfig;
use hotwheels_drivers::sensor::{ActiveLevel, PhotoGateConfig};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SetupError;

/// Embedded default configuration
/// Edit hotwheels.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../hotwheels.toml");

/// Receiver level while the beam is broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorLevel {
    #[default]
    High,
    Low,
}

/// Photo-gate wiring, shared by both gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorConfig {
    pub active: SensorLevel,
    pub debounce_samples: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            active: SensorLevel::High,
            debounce_samples: 1,
        }
    }
}

impl SensorConfig {
    /// Driver configuration for one gate
    pub fn photogate(&self) -> PhotoGateConfig {
        PhotoGateConfig {
            active: match self.active {
                SensorLevel::High => ActiveLevel::High,
                SensorLevel::Low => ActiveLevel::Low,
            },
            debounce_samples: self.debounce_samples,
        }
    }
}

/// Bench simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Rolling distance from the loading point to the door (m)
    pub ramp_length_m: f64,
    /// Car length along the track (m)
    pub car_length_m: f64,
    /// Ramp travel (degrees)
    pub ramp_max_deg: f64,
    /// Door travel (degrees)
    pub door_max_deg: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ramp_length_m: 0.5,
            car_length_m: 0.07,
            ramp_max_deg: 90.0,
            door_max_deg: 180.0,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub sequencer: SequencerConfig,
    pub sensors: SensorConfig,
    pub sim: SimConfig,
}

impl AppConfig {
    /// Load from `path`, or the embedded default, and validate
    pub fn load(path: Option<&Path>) -> Result<Self, SetupError> {
        let config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading configuration");
                let text = fs::read_to_string(path).map_err(|source| SetupError::ReadConfig {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::parse(&text)?
            }
            None => {
                info!("using embedded configuration");
                Self::parse(EMBEDDED_CONFIG)?
            }
        };

        config.validate()?;
        log_config_summary(&config);
        Ok(config)
    }

    /// Parse TOML text without validating values
    pub fn parse(text: &str) -> Result<Self, SetupError> {
        Ok(toml::from_str(text)?)
    }

    /// Reject values the rig cannot run with
    pub fn validate(&self) -> Result<(), SetupError> {
        self.sequencer
            .validate()
            .map_err(SetupError::InvalidConfig)?;

        if self.sensors.debounce_samples == 0 {
            return Err(SetupError::InvalidSim("debounce_samples must be at least 1"));
        }

        let sim = &self.sim;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(sim.ramp_length_m) {
            return Err(SetupError::InvalidSim("ramp_length_m must be positive"));
        }
        if !positive(sim.car_length_m) {
            return Err(SetupError::InvalidSim("car_length_m must be positive"));
        }
        if !positive(sim.ramp_max_deg) || !positive(sim.door_max_deg) {
            return Err(SetupError::InvalidSim("axis travel must be positive"));
        }

        Ok(())
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &AppConfig) {
    let seq = &config.sequencer;
    info!(
        catcher_max_m = seq.limits.catcher_max_m,
        timeout_ms = seq.limits.sensor_timeout_ms,
        cooldown_ms = seq.cooldown_ms,
        "configuration loaded"
    );
    debug!(policy = ?seq.fault_policy, "sensor fault policy");
    debug!(
        offset_deg = seq.calibration.offset_deg,
        gate_base_deg = seq.calibration.gate_base_deg,
        "ramp calibration"
    );
    debug!(
        active = ?config.sensors.active,
        debounce = config.sensors.debounce_samples,
        "photo-gates"
    );
}
