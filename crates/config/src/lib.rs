//! # Shardnode Configuration
//!
//! Configuration parsing and logging setup for a Shardnode process.
//!
//! Every setting lives in one `shardnode.toml` file. Sections and fields may be
//! omitted; the defaults describe a mainnet-like node.
//!
//! ## Usage
//!
//! ```rust
//! use shardnode_config::Config;
//!
//! let config = Config::from_str(r#"
//!     [guardian]
//!     activation_delay_epochs = 20
//!
//!     [slashing]
//!     max_rounds = 5
//! "#).unwrap();
//!
//! assert_eq!(config.guardian.activation_delay_epochs, 20);
//! assert!(config.guardian.enabled);
//! assert_eq!(config.epoch.rounds_per_epoch, 14400);
//! ```
//!
//! ## Configuration Sections
//!
//! - `[guardian]` - Guarded accounts (activation delay, on/off switch)
//! - `[epoch]` - Round schedule (rounds per epoch, start epoch and round)
//! - `[slashing]` - Evidence retention (rounds kept)
//! - `[logging]` - Logging settings (level, format)

mod config;
mod error;
pub mod logging;

pub use config::*;
pub use error::*;
