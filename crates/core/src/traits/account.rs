//! Account access traits.
//!
//! The state layer owns accounts and their data tries. The caches in this
//! workspace only ever need to read and write a single value stored under a
//! well-known sub-key, so that is all [`AccountView`] exposes.

use bytes::Bytes;
use shardnode_types::Address;
use thiserror::Error;

/// Errors that can occur while accessing account data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The account is not a user account and has no data trie.
    #[error("account {0} does not support sub-key storage")]
    NotUserAccount(Address),

    /// The underlying data trie could not be read.
    #[error("account data read failed: {0}")]
    Read(String),

    /// The underlying data trie rejected the write.
    #[error("account data write failed: {0}")]
    Write(String),
}

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Sub-key access to a user account.
///
/// Writers take `&mut self`: the state layer hands out exclusive access to an
/// account for the duration of a transaction, which serializes concurrent
/// updates of the same account.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
pub trait AccountView: Send + Sync {
    /// Address of the account.
    fn address(&self) -> Address;

    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    fn read_sub_key(&self, key: &[u8]) -> AccountResult<Option<Bytes>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write_sub_key(&mut self, key: &[u8], value: &[u8]) -> AccountResult<()>;
}
