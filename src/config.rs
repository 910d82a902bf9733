//! Timing configuration for the phase cycle.
//!
//! Durations come from a JSON file (or the built-in defaults) and can be
//! overridden per process with `INTERSECTION_GREEN_MS` / `INTERSECTION_YELLOW_MS`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data_structures::Phase;
use crate::error::ConfigError;
use crate::global_variables::{
    DEFAULT_GREEN_DURATION_MS, DEFAULT_YELLOW_DURATION_MS, ENV_GREEN_DURATION_MS,
    ENV_YELLOW_DURATION_MS,
};

/// Phase durations, immutable once the controller is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_green")]
    pub green_duration_ms: u64,
    #[serde(default = "default_yellow")]
    pub yellow_duration_ms: u64,
}

fn default_green() -> u64 {
    DEFAULT_GREEN_DURATION_MS
}

fn default_yellow() -> u64 {
    DEFAULT_YELLOW_DURATION_MS
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            green_duration_ms: DEFAULT_GREEN_DURATION_MS,
            yellow_duration_ms: DEFAULT_YELLOW_DURATION_MS,
        }
    }
}

impl TimingConfig {
    pub fn new(green_duration_ms: u64, yellow_duration_ms: u64) -> Result<Self, ConfigError> {
        let config = Self {
            green_duration_ms,
            yellow_duration_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the config from a JSON file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Json`] if it is not valid JSON, or
    /// [`ConfigError::Invalid`] if a duration is zero.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse the config from a JSON string, then apply environment overrides.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        let config = config.with_overrides(
            std::env::var(ENV_GREEN_DURATION_MS).ok(),
            std::env::var(ENV_YELLOW_DURATION_MS).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().with_overrides(
            std::env::var(ENV_GREEN_DURATION_MS).ok(),
            std::env::var(ENV_YELLOW_DURATION_MS).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Replace durations with the given raw override values. Values that do
    /// not parse as milliseconds are ignored.
    pub fn with_overrides(mut self, green: Option<String>, yellow: Option<String>) -> Self {
        if let Some(raw) = green {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.green_duration_ms = ms,
                Err(_) => log::warn!("Ignoring {}={:?}: not a millisecond count", ENV_GREEN_DURATION_MS, raw),
            }
        }
        if let Some(raw) = yellow {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.yellow_duration_ms = ms,
                Err(_) => log::warn!("Ignoring {}={:?}: not a millisecond count", ENV_YELLOW_DURATION_MS, raw),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.green_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("green duration must be non-zero"),
            });
        }
        if self.yellow_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("yellow duration must be non-zero"),
            });
        }
        Ok(())
    }

    /// How long `phase` lasts before the next advance.
    pub fn duration_for(&self, phase: Phase) -> Duration {
        if phase.is_yellow() {
            Duration::from_millis(self.yellow_duration_ms)
        } else {
            Duration::from_millis(self.green_duration_ms)
        }
    }
}
