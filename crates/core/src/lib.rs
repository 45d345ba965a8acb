//! # Shardnode Core - Seam Traits
//!
//! This crate defines the narrow interfaces through which the guarded-account
//! service, the evidence cache and the proofs pool talk to the rest of the
//! node:
//!
//! - **Accounts**: [`AccountView`] reads and writes a value under a sub-key of
//!   a user account's data trie
//! - **Serialization**: [`Marshaller`] turns values into deterministic bytes
//! - **Epochs**: [`EpochNotifier`] / [`EpochSubscriber`] broadcast epoch changes
//!
//! # Design Philosophy
//!
//! 1. **Capabilities, not hierarchies**: an account is anything that can read
//!    and write sub-keys.
//! 2. **Thread safety**: all traits require `Send + Sync`.
//! 3. **Synchronous**: every operation is non-blocking apart from lock
//!    acquisition, so none of the traits are async.
//!
//! # Example
//!
//! ```
//! use shardnode_core::{AccountView, MemoryAccount};
//! use shardnode_types::Address;
//!
//! let mut account = MemoryAccount::new(Address::repeat_byte(1));
//! account.write_sub_key(b"key", b"value").unwrap();
//! assert_eq!(account.read_sub_key(b"key").unwrap().as_deref(), Some(&b"value"[..]));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod testing;
pub mod traits;

pub use testing::{InjectedFailure, MemoryAccount};
pub use traits::{
    // Accounts
    AccountError, AccountResult, AccountView,
    // Epochs
    EpochNotifier, EpochSubscriber,
    // Serialization
    MarshalError, MarshalResult, Marshaller, RlpMarshaller,
};
