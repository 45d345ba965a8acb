//! 32-byte digest type.
//!
//! [`H256`] carries header hashes through the evidence cache and the proofs
//! pool. Hashes are computed by the caller; [`H256::keccak256`] exists for
//! fixtures and tooling.

use crate::{Error, Result};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Size of a hash in bytes
pub const HASH_SIZE: usize = 32;

/// A 32-byte hash value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct H256([u8; HASH_SIZE]);

impl H256 {
    /// The nil hash (all zeros), meaning "no hash".
    pub const NIL: Self = Self([0u8; HASH_SIZE]);

    /// Creates a new hash from a 32-byte array.
    #[inline]
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice.
    ///
    /// Returns an error if the slice length is not exactly 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; HASH_SIZE] = slice.try_into().map_err(|_| Error::InvalidLength {
            expected: HASH_SIZE,
            actual: slice.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Computes the Keccak256 hash of the given data.
    pub fn keccak256(data: &[u8]) -> Self {
        let mut bytes = [0u8; HASH_SIZE];
        bytes.copy_from_slice(&Keccak256::digest(data));
        Self(bytes)
    }

    /// Returns the hash as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Checks if this is the nil/zero hash.
    #[inline]
    pub fn is_nil(&self) -> bool {
        self == &Self::NIL
    }

    /// Parses a hash from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        Self::from_slice(&hex::decode(s)?)
    }

    /// Returns the hex representation with 0x prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short form used in log fields: first four bytes in hex.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for H256 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<[u8; HASH_SIZE]> for H256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for H256 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Encodable for H256 {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.encoder().encode_value(&self.0);
    }
}

impl Decodable for H256 {
    fn decode(rlp: &Rlp<'_>) -> std::result::Result<Self, DecoderError> {
        rlp.decoder().decode_value(|bytes| {
            <[u8; HASH_SIZE]>::try_from(bytes)
                .map(Self)
                .map_err(|_| DecoderError::RlpInvalidLength)
        })
    }
}

/// Computes the Keccak256 hash of the given data.
#[inline]
pub fn keccak256(data: &[u8]) -> H256 {
    H256::keccak256(data)
}
