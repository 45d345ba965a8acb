//! In-memory doubles for the seam traits.
//!
//! Used by the unit and integration tests of downstream crates, and handy for
//! tooling that needs an account without a state layer.

use std::collections::HashMap;

use bytes::Bytes;
use shardnode_types::Address;

use crate::traits::{AccountError, AccountResult, AccountView};

/// Failure injected into a [`MemoryAccount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectedFailure {
    /// Behave normally.
    #[default]
    None,
    /// Every read fails with [`AccountError::Read`].
    Reads,
    /// Every write fails with [`AccountError::Write`].
    Writes,
    /// The account reports itself as a non-user account.
    NotUserAccount,
}

/// An account whose data trie is a plain hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccount {
    address: Address,
    data: HashMap<Vec<u8>, Bytes>,
    failure: InjectedFailure,
    writes: usize,
}

impl MemoryAccount {
    /// Create an empty account at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Make subsequent operations fail as described by `failure`.
    pub fn inject_failure(&mut self, failure: InjectedFailure) {
        self.failure = failure;
    }

    /// Raw value under `key`, bypassing failure injection.
    pub fn raw(&self, key: &[u8]) -> Option<&Bytes> {
        self.data.get(key)
    }

    /// Store a raw value, bypassing failure injection.
    pub fn set_raw(&mut self, key: &[u8], value: impl Into<Bytes>) {
        self.data.insert(key.to_vec(), value.into());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl AccountView for MemoryAccount {
    fn address(&self) -> Address {
        self.address
    }

    fn read_sub_key(&self, key: &[u8]) -> AccountResult<Option<Bytes>> {
        match self.failure {
            InjectedFailure::Reads => Err(AccountError::Read("injected read failure".into())),
            InjectedFailure::NotUserAccount => Err(AccountError::NotUserAccount(self.address)),
            _ => Ok(self.data.get(key).cloned()),
        }
    }

    fn write_sub_key(&mut self, key: &[u8], value: &[u8]) -> AccountResult<()> {
        match self.failure {
            InjectedFailure::Writes => Err(AccountError::Write("injected write failure".into())),
            InjectedFailure::NotUserAccount => Err(AccountError::NotUserAccount(self.address)),
            _ => {
                self.data
                    .insert(key.to_vec(), Bytes::copy_from_slice(value));
                self.writes += 1;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_account_roundtrip() {
        let mut account = MemoryAccount::new(Address::repeat_byte(1));
        assert_eq!(account.read_sub_key(b"k").unwrap(), None);

        account.write_sub_key(b"k", b"v").unwrap();
        assert_eq!(account.read_sub_key(b"k").unwrap(), Some(Bytes::from_static(b"v")));
        assert_eq!(account.write_count(), 1);
    }

    #[test]
    fn test_injected_failures() {
        let addr = Address::repeat_byte(2);
        let mut account = MemoryAccount::new(addr);

        account.inject_failure(InjectedFailure::Writes);
        assert!(matches!(
            account.write_sub_key(b"k", b"v"),
            Err(AccountError::Write(_))
        ));
        assert_eq!(account.write_count(), 0);

        account.inject_failure(InjectedFailure::Reads);
        assert!(matches!(account.read_sub_key(b"k"), Err(AccountError::Read(_))));

        account.inject_failure(InjectedFailure::NotUserAccount);
        assert_eq!(
            account.read_sub_key(b"k"),
            Err(AccountError::NotUserAccount(addr))
        );
    }
}
