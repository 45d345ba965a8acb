//! Bounded round evidence cache.
//!
//! Headers are grouped by round, then by proposer public key. Within one
//! `(round, proposer)` bucket headers keep their arrival order and every hash
//! is distinct. The number of distinct rounds is bounded; eviction drops the
//! oldest round with all of its buckets.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;
use shardnode_types::Round;
use tracing::{debug, trace};

use crate::header::{short_key, HeaderInfo};
use crate::{EvidenceError, EvidenceResult};

type ProposerBuckets = HashMap<Bytes, Vec<HeaderInfo>>;

struct Rounds {
    by_round: HashMap<Round, ProposerBuckets>,
    /// Smallest key of `by_round`, `Round::MAX` while empty
    oldest_round: Round,
}

impl Rounds {
    fn new() -> Self {
        Self {
            by_round: HashMap::new(),
            oldest_round: Round::MAX,
        }
    }

    /// Full for `round` when at capacity and `round` would be a new entry.
    fn is_full_for(&self, round: Round, max_rounds: usize) -> bool {
        self.by_round.len() >= max_rounds && !self.by_round.contains_key(&round)
    }

    fn bucket(&self, round: Round, pub_key: &[u8]) -> Option<&Vec<HeaderInfo>> {
        self.by_round.get(&round).and_then(|buckets| buckets.get(pub_key))
    }

    fn evict_oldest(&mut self) {
        let evicted = self.oldest_round;
        if let Some(buckets) = self.by_round.remove(&evicted) {
            debug!(
                round = evicted,
                proposers = buckets.len(),
                "Evicted oldest evidence round"
            );
        }
        self.oldest_round = self.by_round.keys().copied().min().unwrap_or(Round::MAX);
    }
}

/// Per-round, per-proposer header store retaining the most recent rounds.
pub struct RoundEvidenceCache {
    max_rounds: usize,
    rounds: RwLock<Rounds>,
}

impl RoundEvidenceCache {
    /// Create a cache retaining up to `max_rounds` distinct rounds.
    pub fn new(max_rounds: usize) -> EvidenceResult<Self> {
        if max_rounds == 0 {
            return Err(EvidenceError::InvalidCapacity);
        }
        Ok(Self {
            max_rounds,
            rounds: RwLock::new(Rounds::new()),
        })
    }

    /// Record `header_info` under `(round, pub_key)`.
    ///
    /// # Errors
    ///
    /// * [`EvidenceError::StaleRound`] - the cache is full and `round` is older
    ///   than every retained round
    /// * [`EvidenceError::DuplicateHash`] - the bucket already holds a header
    ///   with the same hash
    pub fn add(&self, round: Round, pub_key: &[u8], header_info: HeaderInfo) -> EvidenceResult<()> {
        if pub_key.is_empty() {
            return Err(EvidenceError::NilInput("proposer public key"));
        }

        let mut rounds = self.rounds.write();

        let full = rounds.is_full_for(round, self.max_rounds);
        if full && round < rounds.oldest_round {
            trace!(round, oldest = rounds.oldest_round, "Rejecting stale evidence round");
            return Err(EvidenceError::StaleRound {
                round,
                oldest: rounds.oldest_round,
            });
        }

        if let Some(headers) = rounds.bucket(round, pub_key) {
            if headers.iter().any(|h| h.hash == header_info.hash) {
                trace!(round, hash = %header_info.hash.short(), "Duplicate evidence header");
                return Err(EvidenceError::DuplicateHash {
                    round,
                    hash: header_info.hash,
                });
            }
        }

        if full {
            rounds.evict_oldest();
        }
        if round < rounds.oldest_round {
            rounds.oldest_round = round;
        }

        trace!(
            round,
            proposer = %short_key(pub_key),
            hash = %header_info.hash.short(),
            "Recorded evidence header"
        );
        rounds
            .by_round
            .entry(round)
            .or_default()
            .entry(Bytes::copy_from_slice(pub_key))
            .or_default()
            .push(header_info);
        Ok(())
    }

    /// Headers recorded for `(round, pub_key)`, in arrival order.
    pub fn get_headers(&self, round: Round, pub_key: &[u8]) -> Vec<HeaderInfo> {
        self.rounds
            .read()
            .bucket(round, pub_key)
            .cloned()
            .unwrap_or_default()
    }

    /// Proposer keys with at least one header in `round`.
    pub fn get_pub_keys(&self, round: Round) -> Vec<Bytes> {
        self.rounds
            .read()
            .by_round
            .get(&round)
            .map(|buckets| buckets.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Oldest retained round, `Round::MAX` while the cache is empty.
    pub fn oldest_round(&self) -> Round {
        self.rounds.read().oldest_round
    }

    /// True if `round` is retained.
    pub fn contains_round(&self, round: Round) -> bool {
        self.rounds.read().by_round.contains_key(&round)
    }

    /// Number of distinct rounds retained.
    pub fn len(&self) -> usize {
        self.rounds.read().by_round.len()
    }

    /// True if no round is retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of rounds retained.
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }
}

impl std::fmt::Debug for RoundEvidenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEvidenceCache")
            .field("max_rounds", &self.max_rounds)
            .field("rounds", &self.len())
            .field("oldest_round", &self.oldest_round())
            .finish()
    }
}
