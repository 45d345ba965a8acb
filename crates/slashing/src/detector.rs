//! Multiple-proposal detection.
//!
//! A proposer is expected to sign exactly one header per round. The detector
//! records every header it is shown and produces a [`MultipleProposalProof`]
//! as soon as a proposer has more than one distinct header in the same round.

use std::collections::HashSet;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shardnode_types::Round;
use tracing::debug;

use crate::cache::RoundEvidenceCache;
use crate::header::HeaderInfo;
use crate::{EvidenceError, EvidenceResult};

/// Severity of a detected offence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreatLevel {
    /// Two conflicting headers
    Medium,
    /// Three or more conflicting headers
    High,
}

impl ThreatLevel {
    /// Threat level for a proposer that signed `headers` headers in one round.
    pub fn for_header_count(headers: usize) -> Self {
        if headers > 2 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// Evidence that one proposer signed several headers for the same round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleProposalProof {
    /// Round of the offence
    pub round: Round,
    /// Public key of the offending proposer
    pub proposer: Bytes,
    /// Conflicting headers, in arrival order
    pub headers: Vec<HeaderInfo>,
    /// Severity derived from the number of headers
    pub threat_level: ThreatLevel,
}

/// Detects proposers that signed more than one header in a round.
#[derive(Debug)]
pub struct MultipleProposalDetector {
    cache: RoundEvidenceCache,
}

impl MultipleProposalDetector {
    /// Create a detector watching the last `max_rounds` rounds.
    pub fn new(max_rounds: usize) -> EvidenceResult<Self> {
        Ok(Self::with_cache(RoundEvidenceCache::new(max_rounds)?))
    }

    /// Create a detector on top of an existing cache.
    pub fn with_cache(cache: RoundEvidenceCache) -> Self {
        Self { cache }
    }

    /// The underlying evidence cache.
    pub fn cache(&self) -> &RoundEvidenceCache {
        &self.cache
    }

    /// Record `header_info` and check its proposer for multiple proposals.
    ///
    /// # Arguments
    ///
    /// * `header_info` - Header just received
    /// * `current_round` - Current consensus round; headers from the future or
    ///   `max_rounds` or more rounds behind it are refused
    ///
    /// # Returns
    ///
    /// `Ok(Some(proof))` when the proposer now has at least two headers in the
    /// round, `Ok(None)` otherwise.
    pub fn check_proposal(
        &self,
        header_info: HeaderInfo,
        current_round: Round,
    ) -> EvidenceResult<Option<MultipleProposalProof>> {
        let round = header_info.round;
        let window = self.cache.max_rounds() as Round;
        if round > current_round || current_round - round >= window {
            return Err(EvidenceError::IrrelevantRound {
                round,
                current: current_round,
            });
        }

        let proposer = header_info.proposer.clone();
        let proposer_short = header_info.proposer_short();
        self.cache.add(round, &proposer, header_info)?;

        let headers = self.cache.get_headers(round, &proposer);
        if headers.len() < 2 {
            return Ok(None);
        }

        let threat_level = ThreatLevel::for_header_count(headers.len());
        debug!(
            round,
            proposer = %proposer_short,
            headers = headers.len(),
            ?threat_level,
            "Detected multiple proposals"
        );
        Ok(Some(MultipleProposalProof {
            round,
            proposer,
            headers,
            threat_level,
        }))
    }

    /// Check that `proof` describes a real multiple proposal: at least two
    /// headers, all from the proof's round and proposer, with distinct hashes.
    pub fn validate_proof(&self, proof: &MultipleProposalProof) -> EvidenceResult<()> {
        if proof.headers.len() < 2 {
            return Err(EvidenceError::InvalidProof("fewer than two headers"));
        }
        if proof.headers.iter().any(|h| h.round != proof.round) {
            return Err(EvidenceError::InvalidProof("header from another round"));
        }
        if proof.headers.iter().any(|h| h.proposer != proof.proposer) {
            return Err(EvidenceError::InvalidProof("header from another proposer"));
        }

        let mut seen = HashSet::with_capacity(proof.headers.len());
        if !proof.headers.iter().all(|h| seen.insert(h.hash)) {
            return Err(EvidenceError::InvalidProof("duplicate header hash"));
        }
        Ok(())
    }
}
