//! Error types for output sinks and configuration loading.
//!
//! None of these escalate out of the controller: sink errors are skipped
//! command by command, config errors only surface at startup.

use crate::data_structures::Direction;

/// Failure to deliver one command to an output sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The target referenced by the command does not exist.
    #[error("output target '{target}' is missing")]
    MissingTarget {
        /// Name of the absent target (e.g. "light-north").
        target: String,
    },

    /// Writing the command log failed.
    #[error("failed to write command log: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Serializing a command record failed.
    #[error("failed to serialize command record: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl SinkError {
    pub fn missing_light(direction: Direction) -> Self {
        SinkError::MissingTarget {
            target: format!("light-{}", direction.to_string().to_lowercase()),
        }
    }
}

/// Errors that can occur when loading the timing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The values parsed but cannot drive a cycle.
    #[error("invalid timing configuration: {reason}")]
    Invalid { reason: String },
}
