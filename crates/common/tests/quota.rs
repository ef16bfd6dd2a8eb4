//! Integration tests for storage donation and the quota gate

mod common;

use std::collections::BTreeMap;

use ::common::prelude::*;

#[test]
fn test_committed_fragments_become_quota() {
    common::init_tracing();
    let registry = Registry::default();
    let alice = common::claim(&registry, "alice");
    let sharer = SecretKey::generate();
    assert!(common::grant(&registry, &alice, &sharer).is_accepted());

    let fractions = BTreeMap::from([("alice".to_string(), 1.0)]);
    assert!(registry
        .register_storage_node("alice", common::node(1), &fractions)
        .unwrap()
        .is_accepted());
    for seed in [&b"f1"[..], b"f2", b"f3"] {
        assert!(common::commit(&registry, "alice", common::node(1), "alice", &sharer, &hash(seed))
            .is_accepted());
    }

    assert_eq!(registry.quota("alice"), 3 * common::FRAGMENT_LENGTH);
    assert_eq!(registry.usage("alice"), 0);
    assert_eq!(
        registry.remaining_capacity("alice"),
        3 * common::FRAGMENT_LENGTH
    );
}

#[test]
fn test_full_quota_blocks_writes_until_it_grows() {
    let registry = Registry::default();
    let alice = common::claim(&registry, "alice");
    let sharer = SecretKey::generate();
    assert!(common::grant(&registry, &alice, &sharer).is_accepted());
    common::donate(&registry, &alice, common::node(1), &sharer, 2);

    // fill the quota exactly
    assert!(common::add_blob(&registry, "alice", &sharer, b"doc1", b"p1").is_accepted());
    assert!(common::attach(
        &registry,
        "alice",
        &sharer,
        b"doc1",
        b"p1",
        &[hash(b"a"), hash(b"b")]
    )
    .is_accepted());
    assert_eq!(registry.usage("alice"), registry.quota("alice"));

    for lookup in [&b"doc2"[..], b"doc3"] {
        assert_eq!(
            common::add_blob(&registry, "alice", &sharer, lookup, b"p2"),
            Verdict::Rejected(Rejection::QuotaExceeded)
        );
    }
    // reads are unaffected
    assert!(registry
        .get_metadata_blob("alice", &sharer.public().to_bytes(), b"doc1")
        .unwrap()
        .is_some());

    // one more committed fragment opens room for one more write
    assert!(common::commit(&registry, "alice", common::node(1), "alice", &sharer, &hash(b"c"))
        .is_accepted());
    assert!(common::add_blob(&registry, "alice", &sharer, b"doc2", b"p2").is_accepted());
}

#[test]
fn test_removing_a_blob_frees_capacity() {
    let registry = Registry::default();
    let alice = common::claim(&registry, "alice");
    let sharer = SecretKey::generate();
    assert!(common::grant(&registry, &alice, &sharer).is_accepted());
    common::donate(&registry, &alice, common::node(1), &sharer, 1);

    assert!(common::add_blob(&registry, "alice", &sharer, b"doc1", b"p1").is_accepted());
    assert!(common::attach(&registry, "alice", &sharer, b"doc1", b"p1", &[hash(b"a")]).is_accepted());
    assert_eq!(registry.remaining_capacity("alice"), 0);

    let sharer_bytes = sharer.public().to_bytes();
    assert!(registry
        .remove_metadata_blob("alice", &sharer_bytes, b"doc1", &sharer.sign(b"doc1").to_bytes())
        .unwrap()
        .is_accepted());
    assert_eq!(registry.remaining_capacity("alice"), common::FRAGMENT_LENGTH);
}

#[test]
fn test_shared_node_splits_capacity() {
    let registry = Registry::default();
    let alice = common::claim(&registry, "alice");
    common::claim(&registry, "bob");
    let sharer = SecretKey::generate();
    assert!(common::grant(&registry, &alice, &sharer).is_accepted());

    let fractions = BTreeMap::from([("alice".to_string(), 0.6), ("bob".to_string(), 0.4)]);
    assert!(registry
        .register_storage_node("alice", common::node(7), &fractions)
        .unwrap()
        .is_accepted());
    for i in 0..10 {
        let fragment = hash(format!("fragment-{i}").as_bytes());
        assert!(
            common::commit(&registry, "alice", common::node(7), "alice", &sharer, &fragment)
                .is_accepted()
        );
    }

    assert_eq!(registry.quota("alice"), 6 * common::FRAGMENT_LENGTH);
    assert_eq!(registry.quota("bob"), 4 * common::FRAGMENT_LENGTH);
    assert_eq!(registry.quota("carol"), UNKNOWN_USER);

    let info = registry.storage_node(&common::node(7)).unwrap();
    assert_eq!(info.fractions, fractions);
    assert_eq!(info.fragment_count, 10);
}
