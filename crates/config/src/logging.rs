//! Tracing subscriber setup driven by `[logging]`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ConfigError, ConfigResult};

/// Filter directive for `config`, e.g. `info,shardnode=info`.
pub fn filter_directive(config: &LoggingConfig) -> String {
    let level = config.level.to_lowercase();
    format!("{level},shardnode={level}")
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set. Fails if
/// the configuration is invalid or a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> ConfigResult<()> {
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let result = if config.is_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .try_init()
    };

    result.map_err(|e| ConfigError::LoggingInit(e.to_string()))
}
