//! # Shardnode Guardian
//!
//! Guarded accounts: every account may attach a guardian, a co-signer address
//! that must authorize sensitive operations on it.
//!
//! ## Rotation
//!
//! Setting a guardian is delayed by a fixed number of epochs unless the
//! currently active guardian co-signs the change:
//!
//! ```text
//!        set_guardian (no active)
//! NONE ───────────────────────────► PENDING_ONLY
//!                                     │ epoch ≥ activation
//!                                     ▼
//!                                  ACTIVE_ONLY ──set_guardian(new)──► ACTIVE_AND_PENDING
//!                                     ▲                                 │
//!                                     ├── set_guardian(new, co-signed) ─┤
//!                                     ├── set_guardian(active address) ─┤
//!                                     └── epoch ≥ pending activation ───┘
//! ```
//!
//! A user can therefore never silently replace the active guardian: without
//! its co-signature the new guardian only activates after
//! `activation_delay` epochs, which leaves the owner time to react.
//!
//! ## Example
//!
//! ```rust
//! use shardnode_core::{MemoryAccount, RlpMarshaller};
//! use shardnode_epoch::EpochClock;
//! use shardnode_guardian::{GuardedAccountHandler, GuardedAccountService};
//! use shardnode_types::Address;
//!
//! let clock = EpochClock::new(10);
//! let service = GuardedAccountService::new(RlpMarshaller, &clock, 10).unwrap();
//!
//! let mut account = MemoryAccount::new(Address::repeat_byte(1));
//! let guardian = Address::repeat_byte(0xaa);
//! service.set_guardian(&mut account, guardian, None).unwrap();
//! assert!(service.has_pending_guardian(&account));
//!
//! clock.advance_to(20);
//! assert_eq!(service.get_active_guardian(&account).unwrap(), guardian);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod disabled;
pub mod guardians;
pub mod service;

pub use disabled::DisabledGuardedAccount;
pub use guardians::{Guardian, Guardians, MAX_GUARDIANS};
pub use service::{ConfiguredGuardians, GuardedAccountHandler, GuardedAccountService};

use shardnode_core::{AccountError, MarshalError};
use shardnode_types::Address;
use thiserror::Error;

/// Sub-key under which the guardians blob is stored inside an account.
///
/// The protected prefix keeps user-issued key/value writes from reaching it.
pub const GUARDIANS_KEY: &[u8] = b"SHARDNODEguardians";

/// Typical delay, in epochs, before a guardian set without co-signature
/// becomes active.
pub const DEFAULT_ACTIVATION_DELAY: u32 = 10;

/// Errors that can occur in guarded account operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardianError {
    /// A required argument was absent
    #[error("nil input: {0}")]
    NilInput(&'static str),

    /// The account does not support sub-key storage
    #[error("wrong account type: {0} is not a user account")]
    WrongType(Address),

    /// The account has no guardian configured
    #[error("account has no guardian set")]
    NoGuardianSet,

    /// The account only has a pending guardian
    #[error("account has no active guardian")]
    NoActiveGuardian,

    /// The account has no pending guardian
    #[error("account has no pending guardian")]
    NoPendingGuardian,

    /// Instant rotation co-signed by someone other than the active guardian
    #[error("transaction guardian {signer} does not match account guardian {active}")]
    TransactionAndAccountGuardianMismatch {
        /// The account's active guardian
        active: Address,
        /// The co-signer named by the transaction
        signer: Address,
    },

    /// Activation delay must be at least one epoch
    #[error("invalid guardian activation delay: must be greater than zero")]
    InvalidActivationDelay,

    /// Guarded accounts are disabled on this node
    #[error("guarded accounts are disabled")]
    Disabled,

    /// The guardians blob could not be encoded or decoded
    #[error("guardians serialization failed: {0}")]
    Serialization(#[from] MarshalError),

    /// The account layer failed to read or write the blob
    #[error("guardians persistence failed: {0}")]
    Persistence(AccountError),
}

impl From<AccountError> for GuardianError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotUserAccount(address) => Self::WrongType(address),
            other => Self::Persistence(other),
        }
    }
}

/// Result type for guarded account operations
pub type GuardianResult<T> = Result<T, GuardianError>;
