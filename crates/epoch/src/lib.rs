//! # Shardnode Epoch
//!
//! The epoch clock every epoch-aware cache subscribes to.
//!
//! - [`EpochClock`] - process-wide broadcaster of the current epoch, injected
//!   into its subscribers at construction
//! - [`RoundSchedule`] - maps consensus rounds onto epochs
//!
//! ## Notification Flow
//!
//! ```text
//! header committed ──► observe_round(schedule, round)
//!                            │ epoch_for_round(round) > current?
//!                            ▼
//!                      advance_to(epoch)
//!                            │ under the subscriber lock, in registration order
//!                            ▼
//!              on_epoch_confirmed(new, previous) ──► subscriber atomics
//! ```
//!
//! ## Example
//!
//! ```rust
//! use shardnode_core::EpochNotifier;
//! use shardnode_epoch::{EpochClock, RoundSchedule};
//!
//! let clock = EpochClock::new(0);
//! let schedule = RoundSchedule::new(100, 0).unwrap();
//!
//! assert!(clock.observe_round(&schedule, 250));
//! assert_eq!(clock.current_epoch(), 2);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod clock;
pub mod schedule;

pub use clock::EpochClock;
pub use schedule::{
    RoundSchedule, DEFAULT_ROUNDS_PER_EPOCH, MAX_ROUNDS_PER_EPOCH, MIN_ROUNDS_PER_EPOCH,
};

use thiserror::Error;

/// Errors that can occur while configuring epochs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EpochError {
    /// Invalid epoch length configuration
    #[error("invalid rounds per epoch {length}: must be between {min} and {max}")]
    InvalidRoundsPerEpoch {
        /// The invalid length
        length: u64,
        /// Minimum allowed
        min: u64,
        /// Maximum allowed
        max: u64,
    },
}

/// Result type for epoch operations
pub type EpochResult<T> = Result<T, EpochError>;
