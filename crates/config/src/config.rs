//! Main configuration module for Shardnode
//!
//! All node settings live in one `shardnode.toml` file. Every section and
//! every field is optional; missing values take their defaults.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use shardnode_epoch::{DEFAULT_ROUNDS_PER_EPOCH, MAX_ROUNDS_PER_EPOCH, MIN_ROUNDS_PER_EPOCH};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct containing all Shardnode settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Guarded account settings
    pub guardian: GuardianConfig,

    /// Epoch and round schedule
    pub epoch: EpochConfig,

    /// Evidence cache settings
    pub slashing: SlashingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// The parsed and validated configuration, or an error if loading fails.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;

        debug!("Configuration parsed successfully, validating...");
        config.validate()?;

        info!(
            activation_delay = config.guardian.activation_delay_epochs,
            guardians_enabled = config.guardian.enabled,
            rounds_per_epoch = config.epoch.rounds_per_epoch,
            max_rounds = config.slashing.max_rounds,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string.
    ///
    /// Useful for testing or when configuration is provided as a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.guardian.validate()?;
        self.epoch.validate()?;
        self.slashing.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// =============================================================================
// Guardian Configuration
// =============================================================================

/// Guarded account settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GuardianConfig {
    /// Epochs before a guardian set without co-signature becomes active
    pub activation_delay_epochs: u32,

    /// When false, guarded accounts are disabled on this node
    pub enabled: bool,
}

impl GuardianConfig {
    /// Validate the guardian section
    pub fn validate(&self) -> ConfigResult<()> {
        if self.activation_delay_epochs == 0 {
            return Err(ConfigError::InvalidActivationDelay);
        }
        Ok(())
    }
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            activation_delay_epochs: 10,
            enabled: true,
        }
    }
}

// =============================================================================
// Epoch Configuration
// =============================================================================

/// Epoch and round schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpochConfig {
    /// Number of consensus rounds per epoch
    pub rounds_per_epoch: u64,

    /// Epoch the node starts at
    pub start_epoch: u32,

    /// First round of epoch 0
    pub start_round: u64,
}

impl EpochConfig {
    /// Validate the epoch section
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_ROUNDS_PER_EPOCH..=MAX_ROUNDS_PER_EPOCH).contains(&self.rounds_per_epoch) {
            return Err(ConfigError::InvalidRoundsPerEpoch {
                value: self.rounds_per_epoch,
                min: MIN_ROUNDS_PER_EPOCH,
                max: MAX_ROUNDS_PER_EPOCH,
            });
        }
        Ok(())
    }
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            rounds_per_epoch: DEFAULT_ROUNDS_PER_EPOCH,
            start_epoch: 0,
            start_round: 0,
        }
    }
}

// =============================================================================
// Slashing Configuration
// =============================================================================

/// Evidence cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlashingConfig {
    /// Number of most recent rounds kept as proposer evidence
    pub max_rounds: usize,
}

impl SlashingConfig {
    /// Validate the slashing section
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_rounds == 0 {
            return Err(ConfigError::InvalidMaxRounds);
        }
        Ok(())
    }
}

impl Default for SlashingConfig {
    fn default() -> Self {
        Self { max_rounds: 3 }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl LoggingConfig {
    /// Validate the logging section
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(self.format.clone()));
        }

        Ok(())
    }

    /// True if JSON output is selected
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
