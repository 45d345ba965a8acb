//! Aggregated header proof.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shardnode_types::{Nonce, ShardId, H256};

/// Aggregated signature over a header by the shard's consensus group.
///
/// Identity is `(shard_id, header_hash)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Hash of the proven header
    pub header_hash: H256,
    /// Shard the header belongs to
    pub shard_id: ShardId,
    /// Aggregated signature of the signers
    pub aggregated_signature: Bytes,
    /// Bitmap of the consensus group members that signed
    pub pub_keys_bitmap: Bytes,
    /// Nonce of the proven header
    pub nonce: Nonce,
}

impl Proof {
    /// Create a proof.
    pub fn new(
        header_hash: H256,
        shard_id: ShardId,
        aggregated_signature: Bytes,
        pub_keys_bitmap: Bytes,
        nonce: Nonce,
    ) -> Self {
        Self {
            header_hash,
            shard_id,
            aggregated_signature,
            pub_keys_bitmap,
            nonce,
        }
    }

    /// True if the proof carries no header hash or no signature.
    pub fn is_nil(&self) -> bool {
        self.header_hash.is_nil() || self.aggregated_signature.is_empty()
    }
}
