//! Deterministic value serialization.

use rlp::{Decodable, Encodable};
use thiserror::Error;

/// Errors reported by a [`Marshaller`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// The bytes could not be decoded into the requested type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The value could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Result type for marshalling operations.
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Converts values to and from bytes.
///
/// Encoding must be deterministic: marshalling the same value twice yields
/// byte-identical output, and the layout must stay stable across releases
/// because the bytes are persisted inside accounts.
pub trait Marshaller: Send + Sync + 'static {
    /// Encode `value`.
    fn marshal<T: Encodable>(&self, value: &T) -> MarshalResult<Vec<u8>>;

    /// Decode a `T` from `data`.
    fn unmarshal<T: Decodable>(&self, data: &[u8]) -> MarshalResult<T>;
}

/// [`Marshaller`] backed by RLP.
///
/// RLP lists are length prefixed and ordered, and every value has exactly one
/// canonical encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RlpMarshaller;

impl Marshaller for RlpMarshaller {
    fn marshal<T: Encodable>(&self, value: &T) -> MarshalResult<Vec<u8>> {
        Ok(rlp::encode(value).to_vec())
    }

    fn unmarshal<T: Decodable>(&self, data: &[u8]) -> MarshalResult<T> {
        rlp::decode(data).map_err(|e| MarshalError::Decode(e.to_string()))
    }
}
