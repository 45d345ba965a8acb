//! Proofs of a single shard.

use std::collections::{BTreeMap, HashMap};

use shardnode_types::{Nonce, H256};

use crate::proof::Proof;

/// Proofs of one shard, indexed by header hash and by nonce.
///
/// Several proofs can share a nonce while forks are unresolved; the nonce
/// index keeps them in arrival order.
#[derive(Debug, Default, Clone)]
pub struct ProofsCache {
    by_hash: HashMap<H256, Proof>,
    by_nonce: BTreeMap<Nonce, Vec<H256>>,
}

impl ProofsCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `proof` unless a proof for the same header is present.
    ///
    /// Returns `false` when the header already had a proof.
    pub fn insert(&mut self, proof: Proof) -> bool {
        if self.by_hash.contains_key(&proof.header_hash) {
            return false;
        }
        self.by_nonce
            .entry(proof.nonce)
            .or_default()
            .push(proof.header_hash);
        self.by_hash.insert(proof.header_hash, proof);
        true
    }

    /// Proof for `header_hash`.
    pub fn get(&self, header_hash: &H256) -> Option<&Proof> {
        self.by_hash.get(header_hash)
    }

    /// First proof received for `nonce`.
    pub fn get_by_nonce(&self, nonce: Nonce) -> Option<&Proof> {
        self.by_nonce
            .get(&nonce)
            .and_then(|hashes| hashes.first())
            .and_then(|hash| self.by_hash.get(hash))
    }

    /// True if a proof for `header_hash` is present.
    pub fn contains(&self, header_hash: &H256) -> bool {
        self.by_hash.contains_key(header_hash)
    }

    /// Remove every proof with a nonce below `watermark`, returning how many
    /// were removed.
    pub fn remove_behind(&mut self, watermark: Nonce) -> usize {
        let kept = self.by_nonce.split_off(&watermark);
        let behind = std::mem::replace(&mut self.by_nonce, kept);

        let mut removed = 0;
        for hash in behind.into_values().flatten() {
            if self.by_hash.remove(&hash).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Number of proofs held.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// True if no proof is held.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Lowest nonce held.
    pub fn lowest_nonce(&self) -> Option<Nonce> {
        self.by_nonce.keys().next().copied()
    }
}
