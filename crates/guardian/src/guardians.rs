//! The guardians blob stored inside each guarded account.
//!
//! An account carries at most two guardians: the active one and at most one
//! pending one. Promotion is implicit: a guardian is active as soon as the
//! current epoch reaches its activation epoch, so the blob is never rewritten
//! on an epoch tick.
//!
//! ## Wire Format
//!
//! ```text
//! guardians := rlp_list( guardian* )        0..=2 entries, insertion order
//! guardian  := rlp_list( address, epoch )   address: 32-byte string
//!                                           epoch:   u32 scalar
//! ```
//!
//! The layout is persisted and must stay stable across releases.

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use serde::{Deserialize, Serialize};
use shardnode_types::{Address, Epoch};

use crate::{GuardianError, GuardianResult};

/// Maximum number of guardians an account can hold.
pub const MAX_GUARDIANS: usize = 2;

/// A co-signer attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guardian {
    /// Guardian address
    pub address: Address,
    /// First epoch in which the guardian is active
    pub activation_epoch: Epoch,
}

impl Guardian {
    /// Creates a guardian activating at `activation_epoch`.
    pub fn new(address: Address, activation_epoch: Epoch) -> Self {
        Self {
            address,
            activation_epoch,
        }
    }

    /// True if the guardian is active at `epoch`.
    #[inline]
    pub fn is_active_at(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch
    }

    /// True if the guardian is still pending at `epoch`.
    #[inline]
    pub fn is_pending_at(&self, epoch: Epoch) -> bool {
        !self.is_active_at(epoch)
    }
}

impl Encodable for Guardian {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.address);
        s.append(&self.activation_epoch);
    }
}

impl Decodable for Guardian {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            address: rlp.val_at(0)?,
            activation_epoch: rlp.val_at(1)?,
        })
    }
}

/// Guardians configured on one account, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardians(Vec<Guardian>);

impl Guardians {
    /// Blob holding a single guardian.
    pub fn single(guardian: Guardian) -> Self {
        Self(vec![guardian])
    }

    /// Guardians in insertion order.
    pub fn as_slice(&self) -> &[Guardian] {
        &self.0
    }

    /// Number of configured guardians.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no guardian is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The active guardian at `epoch`: among guardians whose activation epoch
    /// has been reached, the one activated most recently.
    pub fn active_at(&self, epoch: Epoch) -> Option<&Guardian> {
        self.0
            .iter()
            .filter(|g| g.is_active_at(epoch))
            .max_by_key(|g| g.activation_epoch)
    }

    /// The pending guardian at `epoch`, if any.
    pub fn pending_at(&self, epoch: Epoch) -> Option<&Guardian> {
        self.0.iter().find(|g| g.is_pending_at(epoch))
    }

    /// The active guardian at `epoch`, or the error describing why there is
    /// none.
    pub fn require_active(&self, epoch: Epoch) -> GuardianResult<&Guardian> {
        if self.is_empty() {
            return Err(GuardianError::NoGuardianSet);
        }
        self.active_at(epoch).ok_or(GuardianError::NoActiveGuardian)
    }

    /// Blob after scheduling `new` at `epoch`.
    ///
    /// - no guardian: `[new]`
    /// - no active guardian: rejected, an existing pending guardian is never
    ///   replaced before it activates
    /// - `new` has the active guardian's address: `[active]`, dropping any
    ///   pending guardian
    /// - otherwise: `[active, new]`, replacing any pending guardian
    pub fn schedule(&self, new: Guardian, epoch: Epoch) -> GuardianResult<Self> {
        if self.is_empty() {
            return Ok(Self::single(new));
        }

        let active = *self.active_at(epoch).ok_or(GuardianError::NoActiveGuardian)?;
        if active.address == new.address {
            Ok(Self::single(active))
        } else {
            Ok(Self(vec![active, new]))
        }
    }
}

impl From<Vec<Guardian>> for Guardians {
    fn from(guardians: Vec<Guardian>) -> Self {
        Self(guardians)
    }
}

impl Encodable for Guardians {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append_list(&self.0);
    }
}

impl Decodable for Guardians {
    fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
        if rlp.item_count()? > MAX_GUARDIANS {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self(rlp.as_list()?))
    }
}
