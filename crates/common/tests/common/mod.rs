//! Shared test utilities for registry integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;

use common::prelude::*;

pub const FRAGMENT_LENGTH: i64 = 65536;

/// Route registry events to the test output when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A registered username and the key that claimed it
pub struct User {
    pub name: String,
    pub key: SecretKey,
}

impl User {
    pub fn public_bytes(&self) -> [u8; 32] {
        self.key.public().to_bytes()
    }
}

/// Claim `name` with a fresh key, asserting the claim goes through
pub fn claim(registry: &Registry, name: &str) -> User {
    let key = SecretKey::generate();
    let verdict = registry
        .claim(
            name,
            &key.public().to_bytes(),
            &key.sign(name.as_bytes()).to_bytes(),
        )
        .unwrap();
    assert!(verdict.is_accepted(), "claim {name}: {verdict}");
    User {
        name: name.to_string(),
        key,
    }
}

pub fn grant(registry: &Registry, owner: &User, sharer: &SecretKey) -> Verdict {
    let bytes = sharer.public().to_bytes();
    registry
        .grant_sharing(&owner.name, &bytes, &owner.key.sign(&bytes).to_bytes())
        .unwrap()
}

pub fn ban(registry: &Registry, owner: &User, sharer: &SecretKey) -> Verdict {
    let bytes = sharer.public().to_bytes();
    registry
        .ban_sharing(&owner.name, &bytes, &owner.key.sign(&bytes).to_bytes())
        .unwrap()
}

pub fn add_blob(
    registry: &Registry,
    owner: &str,
    sharer: &SecretKey,
    lookup: &[u8],
    payload: &[u8],
) -> Verdict {
    registry
        .add_metadata_blob(
            owner,
            &sharer.public().to_bytes(),
            lookup,
            payload,
            &sharer.sign(payload).to_bytes(),
        )
        .unwrap()
}

pub fn attach(
    registry: &Registry,
    owner: &str,
    sharer: &SecretKey,
    lookup: &[u8],
    payload: &[u8],
    hashes: &[Hash],
) -> Verdict {
    let concatenated: Vec<u8> = hashes.iter().flat_map(|h| *h.as_bytes()).collect();
    let message = attach_message(lookup, payload, &concatenated);
    registry
        .attach_fragment_hashes(
            owner,
            &sharer.public().to_bytes(),
            lookup,
            payload,
            &concatenated,
            &sharer.sign(&message).to_bytes(),
        )
        .unwrap()
}

pub fn node(port: u16) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], port))
}

/// Pledge a node wholly to `donor` and commit `fragments` distinct hashes to
/// it through `sharer`
pub fn donate(
    registry: &Registry,
    donor: &User,
    address: SocketAddr,
    sharer: &SecretKey,
    fragments: usize,
) {
    let fractions = BTreeMap::from([(donor.name.clone(), 1.0)]);
    let verdict = registry
        .register_storage_node(&donor.name, address, &fractions)
        .unwrap();
    assert!(verdict.is_accepted(), "register node: {verdict}");
    for i in 0..fragments {
        let fragment = hash(format!("{address}/{i}").as_bytes());
        assert!(commit(registry, &donor.name, address, &donor.name, sharer, &fragment).is_accepted());
    }
}

pub fn commit(
    registry: &Registry,
    donor: &str,
    address: SocketAddr,
    owner: &str,
    sharer: &SecretKey,
    fragment: &Hash,
) -> Verdict {
    registry
        .register_fragment_commit(
            donor,
            address,
            owner,
            &sharer.public().to_bytes(),
            fragment.as_bytes(),
            &sharer
                .sign(&commit_message(&sharer.public(), fragment))
                .to_bytes(),
        )
        .unwrap()
}
