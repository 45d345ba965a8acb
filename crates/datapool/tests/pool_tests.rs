//! Tests for the proofs pool.
//!
//! These tests verify:
//! - Nonce watermark cleanup per shard
//! - Idempotent re-adds
//! - Handler notification order and re-entrancy
//! - Concurrent producers

use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use parking_lot::Mutex;
use shardnode_datapool::{Proof, ProofsPool, ProofsPoolError};
use shardnode_types::{Nonce, ShardId, H256};

fn proof(shard_id: ShardId, nonce: Nonce) -> Proof {
    let mut seed = shard_id.to_be_bytes().to_vec();
    seed.extend_from_slice(&nonce.to_be_bytes());
    Proof::new(
        H256::keccak256(&seed),
        shard_id,
        Bytes::from_static(b"aggregated"),
        Bytes::from_static(&[0xff, 0x01]),
        nonce,
    )
}

#[test]
fn test_cleanup_behind_nonce() {
    let pool = ProofsPool::new();
    for nonce in 100..=103 {
        pool.add_proof(proof(0, nonce)).unwrap();
    }

    pool.cleanup_proofs_behind_nonce(0, 102).unwrap();

    for nonce in [100, 101] {
        let hash = proof(0, nonce).header_hash;
        assert!(matches!(
            pool.get_proof(0, &hash),
            Err(ProofsPoolError::MissingProof { shard_id: 0, .. })
        ));
    }
    for nonce in [102, 103] {
        assert_eq!(pool.get_proof(0, &proof(0, nonce).header_hash).unwrap(), proof(0, nonce));
    }
    assert_eq!(pool.shard_len(0), 2);

    pool.cleanup_proofs_behind_nonce(0, 0).unwrap();
    assert_eq!(pool.shard_len(0), 2);
    assert!(pool.has_proof(0, &proof(0, 102).header_hash));
}

#[test]
fn test_readd_keeps_original() {
    let pool = ProofsPool::new();
    let original = proof(1, 7);
    pool.add_proof(original.clone()).unwrap();

    let mut replay = original.clone();
    replay.pub_keys_bitmap = Bytes::from_static(&[0x00]);
    pool.add_proof(replay).unwrap();

    assert_eq!(pool.get_proof(1, &original.header_hash).unwrap(), original);
    assert_eq!(pool.shard_len(1), 1);
}

#[test]
fn test_handlers_in_registration_order() {
    let pool = ProofsPool::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    for tag in 0..3 {
        let log = log.clone();
        pool.register_handler(move |p: &Proof| log.lock().push((tag, p.nonce)));
    }

    pool.add_proof(proof(0, 5)).unwrap();
    pool.add_proof(proof(0, 5)).unwrap();
    pool.add_proof(proof(0, 6)).unwrap();

    assert_eq!(
        *log.lock(),
        vec![(0, 5), (1, 5), (2, 5), (0, 6), (1, 6), (2, 6)]
    );
}

#[test]
fn test_handler_may_reenter_pool() {
    let pool = Arc::new(ProofsPool::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let weak = Arc::downgrade(&pool);
        let seen = seen.clone();
        pool.register_handler(move |p: &Proof| {
            if let Some(pool) = weak.upgrade() {
                seen.lock().push(pool.has_proof(p.shard_id, &p.header_hash));
            }
        });
    }

    pool.add_proof(proof(3, 1)).unwrap();
    assert_eq!(*seen.lock(), vec![true]);
}

#[test]
fn test_concurrent_producers() {
    let pool = Arc::new(ProofsPool::new());

    let handles: Vec<_> = (0..4u32)
        .map(|shard_id| {
            let pool = pool.clone();
            thread::spawn(move || {
                for nonce in 0..50 {
                    pool.add_proof(proof(shard_id, nonce)).unwrap();
                    // Every other shard replays its previous proof
                    if nonce > 0 && shard_id % 2 == 0 {
                        pool.add_proof(proof(shard_id, nonce - 1)).unwrap();
                    }
                }
                pool.cleanup_proofs_behind_nonce(shard_id, 25).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.shards, 4);
    assert_eq!(stats.proofs, 4 * 25);
    for shard_id in 0..4 {
        assert_eq!(pool.get_proof_by_nonce(shard_id, 25).unwrap(), proof(shard_id, 25));
    }
}
