//! Property tests for the round evidence cache.
//!
//! For arbitrary insertion sequences:
//! - the cache retains exactly the `max_rounds` largest rounds it accepted
//! - no `(round, proposer)` bucket ever holds two headers with the same hash

use std::collections::{BTreeSet, HashSet};

use bytes::Bytes;
use proptest::prelude::*;
use shardnode_slashing::{EvidenceError, HeaderInfo, RoundEvidenceCache};
use shardnode_types::H256;

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

fn header(round: u64, key: u8, salt: u8) -> HeaderInfo {
    let mut seed = round.to_be_bytes().to_vec();
    seed.extend([key, salt]);
    HeaderInfo::new(
        H256::keccak256(&seed),
        Bytes::new(),
        round,
        Bytes::from(vec![key]),
    )
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn ascending_rounds_keep_largest(
        max_rounds in 1usize..6,
        rounds in proptest::collection::btree_set(0u64..500, 1..30),
    ) {
        let cache = RoundEvidenceCache::new(max_rounds).unwrap();
        for &round in &rounds {
            cache.add(round, &[1], header(round, 1, 0)).unwrap();
        }

        let expected: Vec<u64> = rounds.iter().rev().take(max_rounds).copied().collect();
        prop_assert_eq!(cache.len(), expected.len());
        for round in &expected {
            prop_assert!(cache.contains_round(*round));
        }
        prop_assert_eq!(cache.oldest_round(), *expected.last().unwrap());
    }

    #[test]
    fn accepted_rounds_are_bounded_and_newest(
        max_rounds in 1usize..6,
        inserts in proptest::collection::vec((0u64..40, 0u8..3, 0u8..4), 1..80),
    ) {
        let cache = RoundEvidenceCache::new(max_rounds).unwrap();
        let mut accepted = BTreeSet::new();

        for (round, key, salt) in inserts {
            match cache.add(round, &[key], header(round, key, salt)) {
                Ok(()) => {
                    accepted.insert(round);
                }
                Err(EvidenceError::StaleRound { oldest, .. }) => {
                    prop_assert!(round < oldest);
                }
                Err(EvidenceError::DuplicateHash { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }

            // Retained rounds are the largest accepted ones
            let expected: Vec<u64> = accepted.iter().rev().take(max_rounds).copied().collect();
            prop_assert_eq!(cache.len(), expected.len());
            for round in &expected {
                prop_assert!(cache.contains_round(*round));
            }
            prop_assert_eq!(cache.oldest_round(), *expected.last().unwrap());
        }
    }

    #[test]
    fn buckets_hold_distinct_hashes(
        inserts in proptest::collection::vec((0u64..4, 0u8..3, 0u8..3), 1..60),
    ) {
        let cache = RoundEvidenceCache::new(4).unwrap();
        for (round, key, salt) in &inserts {
            let _ = cache.add(*round, &[*key], header(*round, *key, *salt));
        }

        for round in 0..4u64 {
            for key in cache.get_pub_keys(round) {
                let headers = cache.get_headers(round, &key);
                let hashes: HashSet<_> = headers.iter().map(|h| h.hash).collect();
                prop_assert_eq!(hashes.len(), headers.len());
            }
        }
    }
}
