use crate::component::{DEFAULT_BUTTON_HOLD_TICKS, DEFAULT_CLOCK_FREQUENCY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

fn default_clock_frequency() -> u32 {
    DEFAULT_CLOCK_FREQUENCY
}

fn default_button_hold_ticks() -> u32 {
    DEFAULT_BUTTON_HOLD_TICKS
}

fn default_wire_hit_tolerance() -> f64 {
    8.0
}

fn default_max_settle_passes() -> usize {
    64
}

fn default_viewport_width() -> i64 {
    900
}

fn default_viewport_height() -> i64 {
    620
}

/// Simulation settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Clock period in ticks; high for the first half.
    #[serde(default = "default_clock_frequency")]
    pub clock_frequency: u32,
    /// Ticks a pressed button stays high.
    #[serde(default = "default_button_hold_ticks")]
    pub button_hold_ticks: u32,
    /// Distance within which `remove_at` deletes a wire.
    #[serde(default = "default_wire_hit_tolerance")]
    pub wire_hit_tolerance: f64,
    /// Upper bound on passes per settled update.
    #[serde(default = "default_max_settle_passes")]
    pub max_settle_passes: usize,
    /// Surface size used to lay out puzzle pins.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: i64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: i64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            clock_frequency: default_clock_frequency(),
            button_hold_ticks: default_button_hold_ticks(),
            wire_hit_tolerance: default_wire_hit_tolerance(),
            max_settle_passes: default_max_settle_passes(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("clock_frequency must be at least 1")]
    ZeroClockFrequency,
}

impl SimConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        if config.clock_frequency == 0 {
            return Err(ConfigError::ZeroClockFrequency);
        }
        Ok(config)
    }
}
