//! Shard-indexed proofs pool.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shardnode_types::{Nonce, ShardId, H256};
use tracing::{debug, trace};

use crate::cache::ProofsCache;
use crate::proof::Proof;
use crate::{ProofLookup, ProofsPoolError, ProofsPoolResult};

/// Callback invoked with every newly added proof.
pub type ProofHandler = Arc<dyn Fn(&Proof) + Send + Sync>;

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProofsPoolStats {
    /// Shards with a proofs cache
    pub shards: usize,
    /// Proofs held across all shards
    pub proofs: usize,
}

/// Proofs of every shard, behind a single lock.
///
/// Handlers run after the pool lock is released, so they may call back into
/// the pool.
#[derive(Default)]
pub struct ProofsPool {
    shards: RwLock<HashMap<ShardId, ProofsCache>>,
    handlers: RwLock<Vec<ProofHandler>>,
}

impl ProofsPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `proof` to its shard.
    ///
    /// Adding a proof for a header that already has one succeeds without
    /// touching the stored proof or notifying handlers.
    pub fn add_proof(&self, proof: Proof) -> ProofsPoolResult<()> {
        if proof.is_nil() {
            return Err(ProofsPoolError::NilProof);
        }

        let shard_id = proof.shard_id;
        let header_hash = proof.header_hash;
        let nonce = proof.nonce;
        let stored = {
            let mut shards = self.shards.write();
            shards.entry(shard_id).or_default().insert(proof.clone())
        };

        if !stored {
            debug!(
                shard_id,
                header_hash = %header_hash.short(),
                nonce,
                "proof already in pool"
            );
            return Ok(());
        }

        trace!(shard_id, header_hash = %header_hash.short(), nonce, "added proof");

        let handlers = self.handlers.read().clone();
        for handler in handlers.iter() {
            handler(&proof);
        }
        Ok(())
    }

    /// Proof for `header_hash` in `shard_id`.
    pub fn get_proof(&self, shard_id: ShardId, header_hash: &H256) -> ProofsPoolResult<Proof> {
        self.shards
            .read()
            .get(&shard_id)
            .and_then(|cache| cache.get(header_hash))
            .cloned()
            .ok_or(ProofsPoolError::MissingProof {
                shard_id,
                lookup: ProofLookup::Hash(*header_hash),
            })
    }

    /// First proof received for `nonce` in `shard_id`.
    pub fn get_proof_by_nonce(&self, shard_id: ShardId, nonce: Nonce) -> ProofsPoolResult<Proof> {
        self.shards
            .read()
            .get(&shard_id)
            .and_then(|cache| cache.get_by_nonce(nonce))
            .cloned()
            .ok_or(ProofsPoolError::MissingProof {
                shard_id,
                lookup: ProofLookup::Nonce(nonce),
            })
    }

    /// True if `shard_id` holds a proof for `header_hash`.
    pub fn has_proof(&self, shard_id: ShardId, header_hash: &H256) -> bool {
        self.shards
            .read()
            .get(&shard_id)
            .is_some_and(|cache| cache.contains(header_hash))
    }

    /// Drop every proof of `shard_id` with a nonce below `watermark`.
    ///
    /// A zero watermark is a no-op. Fails with
    /// [`ProofsPoolError::MissingShard`] if the shard never received a proof.
    pub fn cleanup_proofs_behind_nonce(
        &self,
        shard_id: ShardId,
        watermark: Nonce,
    ) -> ProofsPoolResult<()> {
        if watermark == 0 {
            return Ok(());
        }

        let mut shards = self.shards.write();
        let cache = shards
            .get_mut(&shard_id)
            .ok_or(ProofsPoolError::MissingShard(shard_id))?;

        let removed = cache.remove_behind(watermark);
        if removed > 0 {
            debug!(
                shard_id,
                watermark,
                removed,
                remaining = cache.len(),
                "cleaned up proofs behind nonce"
            );
        }
        Ok(())
    }

    /// Register `handler` to be called with every newly added proof.
    ///
    /// Handlers are called in registration order.
    pub fn register_handler<F>(&self, handler: F)
    where
        F: Fn(&Proof) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    /// Number of proofs held for `shard_id`.
    pub fn shard_len(&self, shard_id: ShardId) -> usize {
        self.shards.read().get(&shard_id).map_or(0, ProofsCache::len)
    }

    /// True if no shard holds a proof.
    pub fn is_empty(&self) -> bool {
        self.shards.read().values().all(ProofsCache::is_empty)
    }

    /// Pool statistics.
    pub fn stats(&self) -> ProofsPoolStats {
        let shards = self.shards.read();
        ProofsPoolStats {
            shards: shards.len(),
            proofs: shards.values().map(ProofsCache::len).sum(),
        }
    }
}

impl std::fmt::Debug for ProofsPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofsPool")
            .field("stats", &self.stats())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
