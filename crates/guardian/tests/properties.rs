//! Property tests for guardian rotation.
//!
//! Random sequences of guardian updates and epoch advances are replayed
//! against one account, checking after every step that:
//! - the blob holds at most two guardians, at most one of them pending
//! - a freshly scheduled guardian activates exactly one delay ahead
//! - a rotation co-signed by anyone but the active guardian never activates
//!   the new guardian early

use proptest::prelude::*;
use shardnode_core::{MemoryAccount, RlpMarshaller};
use shardnode_epoch::EpochClock;
use shardnode_guardian::{GuardedAccountHandler, GuardedAccountService, Guardian, GuardianError};
use shardnode_types::Address;

const DELAY: u32 = 4;

fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(64);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Step {
    Set { guardian: u8, signer: Option<u8> },
    Advance(u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u8..=4, proptest::option::of(1u8..=4))
            .prop_map(|(guardian, signer)| Step::Set { guardian, signer }),
        (1u32..=6).prop_map(Step::Advance),
    ]
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn blob_stays_bounded(steps in proptest::collection::vec(step(), 1..40)) {
        let clock = EpochClock::new(1);
        let service = GuardedAccountService::new(RlpMarshaller, &clock, DELAY).unwrap();
        let mut account = MemoryAccount::new(Address::repeat_byte(0xee));

        for step in steps {
            match step {
                Step::Set { guardian, signer } => {
                    let _ = service.set_guardian(
                        &mut account,
                        Address::repeat_byte(guardian),
                        signer.map(Address::repeat_byte),
                    );
                }
                Step::Advance(by) => {
                    clock.advance_to(service.current_epoch() + by);
                }
            }

            let epoch = service.current_epoch();
            let guardians = service.load_guardians(&account).unwrap();
            let pending = guardians
                .as_slice()
                .iter()
                .filter(|g| g.is_pending_at(epoch))
                .count();

            prop_assert!(guardians.len() <= 2);
            prop_assert!(pending <= 1);
            if guardians.len() == 2 {
                // The first entry is always the one that was active when the
                // second was scheduled
                prop_assert!(guardians.as_slice()[0].is_active_at(epoch));
            }
        }
    }

    #[test]
    fn scheduled_guardian_activates_after_delay(
        start in 0u32..1000,
        prior in proptest::option::of(1u8..=3),
        guardian in 4u8..=8,
    ) {
        let clock = EpochClock::new(start);
        let service = GuardedAccountService::new(RlpMarshaller, &clock, DELAY).unwrap();
        let mut account = MemoryAccount::new(Address::repeat_byte(0xee));

        if let Some(prior) = prior {
            service.set_guardian(&mut account, Address::repeat_byte(prior), None).unwrap();
            clock.advance_to(start + DELAY);
        }

        let epoch = service.current_epoch();
        let address = Address::repeat_byte(guardian);
        service.set_guardian(&mut account, address, None).unwrap();

        let configured = service.get_configured_guardians(&account).unwrap();
        prop_assert_eq!(configured.pending, Some(Guardian::new(address, epoch + DELAY)));
    }

    #[test]
    fn rotation_needs_active_cosigner(
        start in 0u32..1000,
        stranger in 2u8..=9,
        advances in proptest::collection::vec(0u32..=1, 0..(DELAY as usize)),
    ) {
        let active = Address::repeat_byte(1);
        let target = Address::repeat_byte(0xf0);
        let clock = EpochClock::new(start);
        let service = GuardedAccountService::new(RlpMarshaller, &clock, DELAY).unwrap();
        let mut account = MemoryAccount::new(Address::repeat_byte(0xee));

        service.set_guardian(&mut account, active, None).unwrap();
        clock.advance_to(start + DELAY);
        let rotation_epoch = service.current_epoch();

        let result = service.set_guardian(
            &mut account,
            target,
            Some(Address::repeat_byte(stranger)),
        );
        let mismatch = matches!(
            result,
            Err(GuardianError::TransactionAndAccountGuardianMismatch { .. })
        );
        prop_assert!(mismatch);

        // The only way forward without the co-signature is the delayed path
        service.set_guardian(&mut account, target, None).unwrap();
        for by in advances {
            clock.advance_to(service.current_epoch() + by);
            prop_assert!(service.current_epoch() < rotation_epoch + DELAY);
            prop_assert_eq!(service.get_active_guardian(&account).unwrap(), active);
        }
    }
}
