//! Header evidence records.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use shardnode_types::{Round, H256};

/// A header observed on the network, as kept for slashing evidence.
///
/// Identity is the hash: two records with the same hash describe the same
/// header regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Header hash
    pub hash: H256,
    /// Serialized header, opaque to the cache
    pub header: Bytes,
    /// Round the header was proposed in
    pub round: Round,
    /// Public key of the proposer
    pub proposer: Bytes,
}

impl HeaderInfo {
    /// Create a header record.
    pub fn new(hash: H256, header: Bytes, round: Round, proposer: Bytes) -> Self {
        Self {
            hash,
            header,
            round,
            proposer,
        }
    }

    /// Short hex form of the proposer key for log output.
    pub(crate) fn proposer_short(&self) -> String {
        short_key(&self.proposer)
    }
}

/// First eight bytes of `key` in hex.
pub(crate) fn short_key(key: &[u8]) -> String {
    hex::encode(&key[..key.len().min(8)])
}
