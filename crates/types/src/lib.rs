//! # Shardnode Types
//!
//! Primitive identifiers shared by every shardnode crate:
//! - [`Address`] - 32-byte account address (guardians, accounts)
//! - [`H256`] - 32-byte digest used for header hashes
//! - [`Epoch`], [`Round`], [`Nonce`], [`ShardId`] - chain coordinates
//!
//! ## Example
//!
//! ```rust
//! use shardnode_types::{Address, H256};
//!
//! let guardian = Address::repeat_byte(0xaa);
//! assert!(!guardian.is_zero());
//!
//! let hash = H256::keccak256(b"header");
//! assert_ne!(hash, H256::NIL);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod address;
pub mod hash;

pub use address::{Address, ADDRESS_SIZE};
pub use hash::{keccak256, H256, HASH_SIZE};

/// Epoch index. Guardian activation is scheduled in epochs.
pub type Epoch = u32;

/// Consensus round index, finer grained than an epoch.
pub type Round = u64;

/// Per-shard block sequence number.
pub type Nonce = u64;

/// Shard identifier.
pub type ShardId = u32;

/// Result type alias for type conversions
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing or converting primitive types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid hex string
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Invalid length for a fixed-size type
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// RLP decoding error
    #[error("RLP decode error: {0}")]
    RlpDecode(#[from] rlp::DecoderError),
}
