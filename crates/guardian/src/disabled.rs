//! Sentinel handler used when guarded accounts are turned off.

use shardnode_core::AccountView;
use shardnode_types::Address;

use crate::service::{ConfiguredGuardians, GuardedAccountHandler};
use crate::{GuardianError, GuardianResult};

/// Handler that reports no guardians and refuses every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGuardedAccount;

impl GuardedAccountHandler for DisabledGuardedAccount {
    fn has_active_guardian(&self, _account: &dyn AccountView) -> bool {
        false
    }

    fn has_pending_guardian(&self, _account: &dyn AccountView) -> bool {
        false
    }

    fn get_active_guardian(&self, _account: &dyn AccountView) -> GuardianResult<Address> {
        Err(GuardianError::NoGuardianSet)
    }

    fn get_configured_guardians(
        &self,
        _account: &dyn AccountView,
    ) -> GuardianResult<ConfiguredGuardians> {
        Ok(ConfiguredGuardians::default())
    }

    fn set_guardian(
        &self,
        _account: &mut dyn AccountView,
        _guardian: Address,
        _tx_guardian: Option<Address>,
    ) -> GuardianResult<()> {
        Err(GuardianError::Disabled)
    }

    fn clean_other_than_active(&self, _account: &mut dyn AccountView) -> GuardianResult<()> {
        Err(GuardianError::Disabled)
    }

    fn is_empty(&self) -> bool {
        true
    }
}
