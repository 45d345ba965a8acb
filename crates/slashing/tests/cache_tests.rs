//! Tests for the round evidence cache.
//!
//! These tests verify:
//! - Eviction of the oldest round once capacity is reached
//! - Rejection of stale rounds
//! - Concurrent writers sharing one cache
//! - Proof serialization for gossip

use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use shardnode_slashing::{
    EvidenceError, HeaderInfo, MultipleProposalDetector, RoundEvidenceCache, ThreatLevel,
};
use shardnode_types::{Round, H256};

const KEY: &[u8] = b"proposer-key";

fn header(round: Round, salt: u64) -> HeaderInfo {
    let mut seed = round.to_be_bytes().to_vec();
    seed.extend_from_slice(&salt.to_be_bytes());
    HeaderInfo::new(
        H256::keccak256(&seed),
        Bytes::from(seed),
        round,
        Bytes::from_static(KEY),
    )
}

#[test]
fn test_eviction_walkthrough() {
    let cache = RoundEvidenceCache::new(3).unwrap();

    for round in [5, 7, 9, 11] {
        cache.add(round, KEY, header(round, 0)).unwrap();
    }
    assert_eq!(cache.len(), 3);
    assert!(!cache.contains_round(5));
    for round in [7, 9, 11] {
        assert!(cache.contains_round(round));
    }
    assert_eq!(cache.oldest_round(), 7);

    assert_eq!(
        cache.add(6, KEY, header(6, 0)),
        Err(EvidenceError::StaleRound {
            round: 6,
            oldest: 7
        })
    );
    assert!(!cache.contains_round(6));

    cache.add(8, KEY, header(8, 0)).unwrap();
    assert_eq!(cache.len(), 3);
    assert!(!cache.contains_round(7));
    for round in [8, 9, 11] {
        assert!(cache.contains_round(round));
    }
    assert_eq!(cache.oldest_round(), 8);
}

#[test]
fn test_eviction_drops_every_proposer_of_round() {
    let cache = RoundEvidenceCache::new(2).unwrap();
    cache.add(1, b"a", header(1, 0)).unwrap();
    cache.add(1, b"b", header(1, 1)).unwrap();
    cache.add(2, b"a", header(2, 0)).unwrap();
    assert_eq!(cache.get_pub_keys(1).len(), 2);

    cache.add(3, b"a", header(3, 0)).unwrap();
    assert!(cache.get_pub_keys(1).is_empty());
    assert!(cache.get_headers(1, b"b").is_empty());
    assert_eq!(cache.oldest_round(), 2);
}

#[test]
fn test_concurrent_writers() {
    let cache = Arc::new(RoundEvidenceCache::new(4).unwrap());

    let handles: Vec<_> = (0..4u64)
        .map(|writer| {
            let cache = cache.clone();
            thread::spawn(move || {
                for round in 0..20u64 {
                    // Stale rounds are expected once faster writers moved ahead
                    let _ = cache.add(round, KEY, header(round, writer));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 4);
    assert!(cache.contains_round(19));
    assert!(cache.oldest_round() <= 19);
    for pub_key in cache.get_pub_keys(19) {
        assert_eq!(pub_key, Bytes::from_static(KEY));
    }
}

#[test]
fn test_detector_proof_serializes() {
    let detector = MultipleProposalDetector::new(3).unwrap();
    detector.check_proposal(header(12, 0), 12).unwrap();
    let proof = detector
        .check_proposal(header(12, 1), 12)
        .unwrap()
        .expect("second header is a multiple proposal");

    let json = serde_json::to_string(&proof).unwrap();
    let decoded: shardnode_slashing::MultipleProposalProof = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, proof);
    assert_eq!(decoded.threat_level, ThreatLevel::Medium);
}
