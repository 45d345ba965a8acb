//! Guarded account service.
//!
//! [`GuardedAccountService`] reads and writes the guardians blob of an account
//! through [`AccountView`] and keeps a copy of the current epoch, fed by the
//! epoch notifier it subscribes to at construction. It holds no per-account
//! state: concurrent updates of the same account are serialized by the state
//! layer handing out `&mut` access, updates of different accounts run in
//! parallel.
//!
//! Each operation samples the epoch once, at its start. An epoch tick racing
//! with `set_guardian` therefore shifts the activation epoch by at most one,
//! which the activation delay absorbs.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shardnode_core::{AccountView, EpochNotifier, EpochSubscriber, Marshaller, RlpMarshaller};
use shardnode_types::{Address, Epoch};
use tracing::{debug, trace};

use crate::guardians::{Guardian, Guardians};
use crate::{GuardianError, GuardianResult, GUARDIANS_KEY};

/// Active and pending guardian of one account, as exposed to API callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredGuardians {
    /// Guardian active at the current epoch
    pub active: Option<Guardian>,
    /// Guardian waiting for its activation epoch
    pub pending: Option<Guardian>,
}

/// Guarded account operations, implemented by the live service and by the
/// disabled sentinel.
pub trait GuardedAccountHandler: Send + Sync {
    /// True if the account has a guardian active at the current epoch.
    ///
    /// Unreadable blobs count as "no guardian".
    fn has_active_guardian(&self, account: &dyn AccountView) -> bool;

    /// True if the account has a guardian waiting for activation.
    ///
    /// Unreadable blobs count as "no guardian".
    fn has_pending_guardian(&self, account: &dyn AccountView) -> bool;

    /// Address of the guardian active at the current epoch.
    fn get_active_guardian(&self, account: &dyn AccountView) -> GuardianResult<Address>;

    /// Both guardian slots of the account.
    fn get_configured_guardians(
        &self,
        account: &dyn AccountView,
    ) -> GuardianResult<ConfiguredGuardians>;

    /// Set `guardian` on the account.
    ///
    /// With `tx_guardian` present the change is an instant rotation and must
    /// be co-signed by the active guardian. Without it the guardian is
    /// scheduled `activation_delay` epochs ahead.
    fn set_guardian(
        &self,
        account: &mut dyn AccountView,
        guardian: Address,
        tx_guardian: Option<Address>,
    ) -> GuardianResult<()>;

    /// Drop every guardian except the active one.
    fn clean_other_than_active(&self, account: &mut dyn AccountView) -> GuardianResult<()>;

    /// True for the disabled sentinel.
    fn is_empty(&self) -> bool {
        false
    }
}

/// Live guarded account service.
pub struct GuardedAccountService<M: Marshaller = RlpMarshaller> {
    marshaller: M,
    activation_delay: Epoch,
    current_epoch: AtomicU32,
}

impl<M: Marshaller> GuardedAccountService<M> {
    /// Create the service and subscribe it to `notifier`.
    ///
    /// # Arguments
    ///
    /// * `marshaller` - Codec for the guardians blob
    /// * `notifier` - Epoch source; the service keeps its own copy of the epoch
    /// * `activation_delay` - Epochs before a guardian set without co-signature
    ///   becomes active; must be non-zero
    pub fn new(
        marshaller: M,
        notifier: &dyn EpochNotifier,
        activation_delay: Epoch,
    ) -> GuardianResult<Arc<Self>> {
        if activation_delay == 0 {
            return Err(GuardianError::InvalidActivationDelay);
        }

        let service = Arc::new(Self {
            marshaller,
            activation_delay,
            current_epoch: AtomicU32::new(notifier.current_epoch()),
        });
        notifier.subscribe(service.clone());
        Ok(service)
    }

    /// Epoch the service currently operates at.
    pub fn current_epoch(&self) -> Epoch {
        self.current_epoch.load(Ordering::Acquire)
    }

    /// Configured activation delay in epochs.
    pub fn activation_delay(&self) -> Epoch {
        self.activation_delay
    }

    /// Guardian waiting for activation.
    pub fn get_pending_guardian(&self, account: &dyn AccountView) -> GuardianResult<Guardian> {
        let guardians = self.load_guardians(account)?;
        guardians
            .pending_at(self.current_epoch())
            .copied()
            .ok_or(GuardianError::NoPendingGuardian)
    }

    /// Decoded guardians blob; a missing or empty value is an empty blob.
    pub fn load_guardians(&self, account: &dyn AccountView) -> GuardianResult<Guardians> {
        match account.read_sub_key(GUARDIANS_KEY)? {
            Some(bytes) if !bytes.is_empty() => Ok(self.marshaller.unmarshal(&bytes)?),
            _ => Ok(Guardians::default()),
        }
    }

    fn save_guardians(
        &self,
        account: &mut dyn AccountView,
        guardians: &Guardians,
    ) -> GuardianResult<()> {
        let bytes = self.marshaller.marshal(guardians)?;
        account.write_sub_key(GUARDIANS_KEY, &bytes)?;
        Ok(())
    }

    fn instant_set_guardian(
        &self,
        account: &mut dyn AccountView,
        guardian: Address,
        tx_guardian: Address,
        epoch: Epoch,
    ) -> GuardianResult<()> {
        let guardians = self.load_guardians(account)?;
        let active = guardians.require_active(epoch)?;
        if active.address != tx_guardian {
            return Err(GuardianError::TransactionAndAccountGuardianMismatch {
                active: active.address,
                signer: tx_guardian,
            });
        }

        debug!(
            account = %account.address().short(),
            guardian = %guardian.short(),
            epoch,
            "Instant guardian rotation"
        );
        self.save_guardians(account, &Guardians::single(Guardian::new(guardian, epoch)))
    }

    fn delayed_set_guardian(
        &self,
        account: &mut dyn AccountView,
        guardian: Address,
        epoch: Epoch,
    ) -> GuardianResult<()> {
        let guardians = self.load_guardians(account)?;
        let activation_epoch = epoch.saturating_add(self.activation_delay);
        let updated = guardians.schedule(Guardian::new(guardian, activation_epoch), epoch)?;

        debug!(
            account = %account.address().short(),
            guardian = %guardian.short(),
            activation_epoch,
            configured = updated.len(),
            "Scheduled guardian"
        );
        self.save_guardians(account, &updated)
    }
}

impl<M: Marshaller> GuardedAccountHandler for GuardedAccountService<M> {
    fn has_active_guardian(&self, account: &dyn AccountView) -> bool {
        self.load_guardians(account)
            .map(|g| g.active_at(self.current_epoch()).is_some())
            .unwrap_or(false)
    }

    fn has_pending_guardian(&self, account: &dyn AccountView) -> bool {
        self.load_guardians(account)
            .map(|g| g.pending_at(self.current_epoch()).is_some())
            .unwrap_or(false)
    }

    fn get_active_guardian(&self, account: &dyn AccountView) -> GuardianResult<Address> {
        let guardians = self.load_guardians(account)?;
        let active = guardians.require_active(self.current_epoch())?;
        trace!(
            account = %account.address().short(),
            guardian = %active.address.short(),
            "Active guardian"
        );
        Ok(active.address)
    }

    fn get_configured_guardians(
        &self,
        account: &dyn AccountView,
    ) -> GuardianResult<ConfiguredGuardians> {
        let guardians = self.load_guardians(account)?;
        let epoch = self.current_epoch();
        Ok(ConfiguredGuardians {
            active: guardians.active_at(epoch).copied(),
            pending: guardians.pending_at(epoch).copied(),
        })
    }

    fn set_guardian(
        &self,
        account: &mut dyn AccountView,
        guardian: Address,
        tx_guardian: Option<Address>,
    ) -> GuardianResult<()> {
        if guardian.is_zero() {
            return Err(GuardianError::NilInput("guardian address"));
        }

        let epoch = self.current_epoch();
        match tx_guardian {
            Some(signer) if signer.is_zero() => {
                Err(GuardianError::NilInput("transaction guardian"))
            }
            Some(signer) => self.instant_set_guardian(account, guardian, signer, epoch),
            None => self.delayed_set_guardian(account, guardian, epoch),
        }
    }

    fn clean_other_than_active(&self, account: &mut dyn AccountView) -> GuardianResult<()> {
        let guardians = self.load_guardians(account)?;
        let active = *guardians.require_active(self.current_epoch())?;
        if guardians.len() > 1 {
            debug!(
                account = %account.address().short(),
                dropped = guardians.len() - 1,
                "Dropping non-active guardians"
            );
        }
        self.save_guardians(account, &Guardians::single(active))
    }
}

impl<M: Marshaller> EpochSubscriber for GuardedAccountService<M> {
    fn on_epoch_confirmed(&self, new_epoch: Epoch, previous_epoch: Epoch) {
        self.current_epoch.store(new_epoch, Ordering::Release);
        trace!(new_epoch, previous_epoch, "Guarded accounts observed epoch");
    }
}

impl<M: Marshaller> fmt::Debug for GuardedAccountService<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedAccountService")
            .field("activation_delay", &self.activation_delay)
            .field("current_epoch", &self.current_epoch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardnode_core::testing::InjectedFailure;
    use shardnode_core::{AccountError, MemoryAccount};
    use shardnode_epoch::EpochClock;

    fn setup(epoch: Epoch) -> (EpochClock, Arc<GuardedAccountService>, MemoryAccount) {
        let clock = EpochClock::new(epoch);
        let service = GuardedAccountService::new(RlpMarshaller, &clock, 10).unwrap();
        (clock, service, MemoryAccount::new(Address::repeat_byte(0x01)))
    }

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn test_zero_delay_rejected() {
        let clock = EpochClock::new(0);
        let result = GuardedAccountService::new(RlpMarshaller, &clock, 0);
        assert!(matches!(result, Err(GuardianError::InvalidActivationDelay)));
        assert_eq!(clock.subscriber_count(), 0);
    }

    #[test]
    fn test_service_follows_clock() {
        let (clock, service, _) = setup(4);
        assert_eq!(service.current_epoch(), 4);
        clock.advance_to(11);
        assert_eq!(service.current_epoch(), 11);
    }

    #[test]
    fn test_nil_addresses_rejected() {
        let (_clock, service, mut account) = setup(1);
        assert_eq!(
            service.set_guardian(&mut account, Address::ZERO, None),
            Err(GuardianError::NilInput("guardian address"))
        );
        assert_eq!(
            service.set_guardian(&mut account, addr(2), Some(Address::ZERO)),
            Err(GuardianError::NilInput("transaction guardian"))
        );
        assert_eq!(account.write_count(), 0);
    }

    #[test]
    fn test_empty_account_queries() {
        let (_clock, service, account) = setup(1);
        assert!(!service.has_active_guardian(&account));
        assert!(!service.has_pending_guardian(&account));
        assert_eq!(
            service.get_active_guardian(&account),
            Err(GuardianError::NoGuardianSet)
        );
        assert_eq!(
            service.get_pending_guardian(&account),
            Err(GuardianError::NoPendingGuardian)
        );
        assert_eq!(
            service.get_configured_guardians(&account).unwrap(),
            ConfiguredGuardians::default()
        );
    }

    #[test]
    fn test_empty_value_is_empty_blob() {
        let (_clock, service, mut account) = setup(1);
        account.set_raw(GUARDIANS_KEY, Vec::new());
        assert_eq!(
            service.get_active_guardian(&account),
            Err(GuardianError::NoGuardianSet)
        );
    }

    #[test]
    fn test_wrong_account_type() {
        let (_clock, service, mut account) = setup(1);
        account.inject_failure(InjectedFailure::NotUserAccount);

        assert!(!service.has_active_guardian(&account));
        assert_eq!(
            service.get_active_guardian(&account),
            Err(GuardianError::WrongType(addr(0x01)))
        );
    }

    #[test]
    fn test_corrupt_blob_surfaces_serialization_error() {
        let (_clock, service, mut account) = setup(1);
        account.set_raw(GUARDIANS_KEY, vec![0xff, 0x01]);

        assert!(!service.has_active_guardian(&account));
        assert!(!service.has_pending_guardian(&account));
        assert!(matches!(
            service.get_active_guardian(&account),
            Err(GuardianError::Serialization(_))
        ));
        assert!(matches!(
            service.set_guardian(&mut account, addr(2), None),
            Err(GuardianError::Serialization(_))
        ));
    }

    #[test]
    fn test_write_failure_surfaces() {
        let (_clock, service, mut account) = setup(1);
        account.inject_failure(InjectedFailure::Writes);

        assert_eq!(
            service.set_guardian(&mut account, addr(2), None),
            Err(GuardianError::Persistence(AccountError::Write(
                "injected write failure".into()
            )))
        );
    }

    #[test]
    fn test_read_failure_surfaces_on_set() {
        let (_clock, service, mut account) = setup(1);
        account.inject_failure(InjectedFailure::Reads);

        assert!(matches!(
            service.set_guardian(&mut account, addr(2), None),
            Err(GuardianError::Persistence(AccountError::Read(_)))
        ));
    }

    #[test]
    fn test_clean_other_than_active() {
        let (clock, service, mut account) = setup(0);
        service.set_guardian(&mut account, addr(2), None).unwrap();

        // Pending only: nothing to keep
        assert_eq!(
            service.clean_other_than_active(&mut account),
            Err(GuardianError::NoActiveGuardian)
        );

        clock.advance_to(10);
        service.set_guardian(&mut account, addr(3), None).unwrap();
        assert!(service.has_pending_guardian(&account));

        service.clean_other_than_active(&mut account).unwrap();
        assert!(!service.has_pending_guardian(&account));
        assert_eq!(
            service.load_guardians(&account).unwrap(),
            Guardians::single(Guardian::new(addr(2), 10))
        );
    }

    #[test]
    fn test_configured_guardians() {
        let (clock, service, mut account) = setup(0);
        service.set_guardian(&mut account, addr(2), None).unwrap();
        clock.advance_to(12);
        service.set_guardian(&mut account, addr(3), None).unwrap();

        assert_eq!(
            service.get_configured_guardians(&account).unwrap(),
            ConfiguredGuardians {
                active: Some(Guardian::new(addr(2), 10)),
                pending: Some(Guardian::new(addr(3), 22)),
            }
        );
        assert_eq!(
            service.get_pending_guardian(&account).unwrap(),
            Guardian::new(addr(3), 22)
        );
    }
}
