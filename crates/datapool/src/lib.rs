//! # Shardnode Datapool
//!
//! In-memory pool of aggregated signature proofs for headers.
//!
//! Proofs arrive from the network ahead of, or alongside, the headers they
//! finalize. The pool indexes them per shard by header hash and by nonce, and
//! drops everything below a nonce watermark once the shard's headers are
//! final.
//!
//! ## Layout
//!
//! ```text
//! ProofsPool
//!   └── RwLock<HashMap<ShardId, ProofsCache>>
//!         ├── by_hash:  header hash ──► proof
//!         └── by_nonce: nonce ──► header hashes (arrival order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use shardnode_datapool::{Proof, ProofsPool};
//! use shardnode_types::H256;
//!
//! let pool = ProofsPool::new();
//! let proof = Proof::new(
//!     H256::keccak256(b"header"),
//!     0,
//!     Bytes::from_static(b"sig"),
//!     Bytes::from_static(&[0xff]),
//!     7,
//! );
//!
//! pool.add_proof(proof.clone()).unwrap();
//! assert_eq!(pool.get_proof(0, &proof.header_hash).unwrap(), proof);
//!
//! pool.cleanup_proofs_behind_nonce(0, 8).unwrap();
//! assert!(!pool.has_proof(0, &proof.header_hash));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod cache;
pub mod pool;
pub mod proof;

pub use cache::ProofsCache;
pub use pool::{ProofHandler, ProofsPool, ProofsPoolStats};
pub use proof::Proof;

use std::fmt;

use shardnode_types::{Nonce, ShardId, H256};
use thiserror::Error;

/// Key a proof was looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofLookup {
    /// Header hash
    Hash(H256),
    /// Header nonce
    Nonce(Nonce),
}

impl fmt::Display for ProofLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "header hash {}", hash),
            Self::Nonce(nonce) => write!(f, "nonce {}", nonce),
        }
    }
}

/// Errors that can occur in proofs pool operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofsPoolError {
    /// The proof is missing its header hash or signature
    #[error("nil proof")]
    NilProof,

    /// No proof matches the lookup
    #[error("missing proof for {lookup} in shard {shard_id}")]
    MissingProof {
        /// Shard searched
        shard_id: ShardId,
        /// Key searched for
        lookup: ProofLookup,
    },

    /// The pool never received a proof for the shard
    #[error("missing proofs cache for shard {0}")]
    MissingShard(ShardId),
}

/// Result type for proofs pool operations
pub type ProofsPoolResult<T> = Result<T, ProofsPoolError>;
