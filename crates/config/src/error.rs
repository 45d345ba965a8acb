//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize configuration to TOML
    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Guardian activation delay must be at least one epoch
    #[error("Invalid guardian activation delay: must be greater than zero")]
    InvalidActivationDelay,

    /// Epoch length outside the supported range
    #[error("Invalid rounds per epoch: must be between {min} and {max}, got {value}")]
    InvalidRoundsPerEpoch {
        /// Configured value
        value: u64,
        /// Minimum allowed
        min: u64,
        /// Maximum allowed
        max: u64,
    },

    /// Evidence cache must retain at least one round
    #[error("Invalid slashing max_rounds: must be greater than zero")]
    InvalidMaxRounds,

    /// Invalid log level
    #[error("Invalid log level: {0}. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Invalid log format
    #[error("Invalid log format: {0}. Valid values: json, pretty")]
    InvalidLogFormat(String),

    /// The global tracing subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
