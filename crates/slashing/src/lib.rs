//! # Shardnode Slashing
//!
//! Evidence gathering for proposer misbehaviour.
//!
//! - [`RoundEvidenceCache`] - bounded per-round, per-proposer store of the
//!   headers seen on the network
//! - [`MultipleProposalDetector`] - flags proposers that signed more than one
//!   header for the same round
//!
//! ## Retention
//!
//! The cache keeps the `max_rounds` most recent rounds. A header for a round
//! older than every retained round is refused once the cache is full; a newer
//! round evicts the oldest one as a whole:
//!
//! ```text
//! max_rounds = 3
//!
//!  add 5, 7, 9     { 5  7  9 }        oldest = 5
//!  add 11          {    7  9 11 }     oldest = 7   (5 evicted)
//!  add 6           stale round        (6 < 7)
//!  add 8           {  8    9 11 }     oldest = 8   (7 evicted)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use shardnode_slashing::{HeaderInfo, MultipleProposalDetector, ThreatLevel};
//! use shardnode_types::H256;
//!
//! let detector = MultipleProposalDetector::new(3).unwrap();
//! let proposer = Bytes::from_static(b"validator-1");
//!
//! let first = HeaderInfo::new(H256::keccak256(b"a"), Bytes::new(), 10, proposer.clone());
//! let second = HeaderInfo::new(H256::keccak256(b"b"), Bytes::new(), 10, proposer);
//!
//! assert!(detector.check_proposal(first, 10).unwrap().is_none());
//! let proof = detector.check_proposal(second, 10).unwrap().unwrap();
//! assert_eq!(proof.threat_level, ThreatLevel::Medium);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod cache;
pub mod detector;
pub mod header;

pub use cache::RoundEvidenceCache;
pub use detector::{MultipleProposalDetector, MultipleProposalProof, ThreatLevel};
pub use header::HeaderInfo;

use shardnode_types::{Round, H256};
use thiserror::Error;

/// Default number of rounds retained by the evidence cache
pub const DEFAULT_MAX_ROUNDS: usize = 3;

/// Errors that can occur while gathering or checking evidence
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// A required argument was absent
    #[error("nil input: {0}")]
    NilInput(&'static str),

    /// The cache must retain at least one round
    #[error("invalid evidence cache capacity: must be greater than zero")]
    InvalidCapacity,

    /// The header is already recorded for this round and proposer
    #[error("duplicate header hash {hash} in round {round}")]
    DuplicateHash {
        /// Round of the header
        round: Round,
        /// Hash already present
        hash: H256,
    },

    /// The cache is full and the round is older than every retained round
    #[error("stale round {round}: oldest retained round is {oldest}")]
    StaleRound {
        /// Round of the header
        round: Round,
        /// Oldest round held by the cache
        oldest: Round,
    },

    /// The header's round is outside the detection window
    #[error("irrelevant round {round} at current round {current}")]
    IrrelevantRound {
        /// Round of the header
        round: Round,
        /// Current consensus round
        current: Round,
    },

    /// A multiple-proposal proof failed validation
    #[error("invalid proof: {0}")]
    InvalidProof(&'static str),
}

/// Result type for evidence operations
pub type EvidenceResult<T> = Result<T, EvidenceError>;
