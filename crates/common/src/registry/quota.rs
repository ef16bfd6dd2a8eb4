//! Storage donation and quota accounting
//!
//! A storage node pledges its committed capacity to one or more users in
//! fixed fractions. A user's quota is their share of every node that names
//! them; usage is the number of fragments their blobs certify. Both are
//! measured in bytes of `fragment_length`-sized fragments.

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, PublicKey};

use super::error::{check_username, parse_key, parse_signature, MalformedInput};
use super::verdict::{settle, Rejection, Verdict};
use super::{Registry, RegistryInner};

/// Returned by [`Registry::quota`] and [`Registry::usage`] for usernames that
/// are not registered. A registered user without donors has quota `0`.
pub const UNKNOWN_USER: i64 = -1;

#[derive(Debug, Clone)]
pub(super) struct StorageNode {
    owner: String,
    fractions: BTreeMap<String, f64>,
    committed: HashSet<Hash>,
}

impl StorageNode {
    fn size(&self, fragment_length: u64) -> u64 {
        (self.committed.len() as u64).saturating_mul(fragment_length)
    }
}

/// Read-only view of a registered storage node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageNodeInfo {
    pub owner: String,
    pub address: SocketAddr,
    pub fractions: BTreeMap<String, f64>,
    pub fragment_count: usize,
    pub size_bytes: u64,
}

/// The message a sharing key signs to commit a fragment to a node:
/// `sharing_key || hash`
pub fn commit_message(sharing_key: &PublicKey, hash: &Hash) -> Vec<u8> {
    let mut message = sharing_key.to_bytes().to_vec();
    message.extend_from_slice(hash.as_bytes());
    message
}

impl Registry {
    /// Pledge the node at `address` to the users named in `fractions`.
    ///
    /// Fractions must be finite, non-negative and sum to one within the
    /// configured tolerance. The donor and every beneficiary must be
    /// registered, and the address must be new.
    pub fn register_storage_node(
        &self,
        donor: &str,
        address: SocketAddr,
        fractions: &BTreeMap<String, f64>,
    ) -> Result<Verdict, MalformedInput> {
        check_username(donor)?;

        let mut inner = self.inner.lock();
        let result = check_fractions(fractions, self.config.fraction_tolerance)
            .and_then(|()| inner.register_node(donor, address, fractions.clone()));
        if result.is_ok() {
            tracing::info!(donor, %address, beneficiaries = fractions.len(), "storage node registered");
        }
        Ok(settle("register_storage_node", donor, result))
    }

    /// Record that the node at `address` now holds the fragment `hash` for
    /// `owner`.
    ///
    /// `signature` is the sharing key's signature over
    /// [`commit_message`]`(sharing_key, hash)`. An unseen address is
    /// registered on the spot, pledged entirely to `donor`, but only once
    /// every check has passed. Committing a hash twice is accepted.
    pub fn register_fragment_commit(
        &self,
        donor: &str,
        address: SocketAddr,
        owner: &str,
        sharing_key: &[u8],
        hash: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(donor)?;
        check_username(owner)?;
        let sharer = parse_key(sharing_key)?;
        let hash = Hash::try_from(hash)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let result = inner.commit_fragment(donor, address, owner, &sharer, hash, &signature);
        Ok(settle("register_fragment_commit", owner, result))
    }

    /// Bytes `username` is entitled to, or [`UNKNOWN_USER`]
    pub fn quota(&self, username: &str) -> i64 {
        self.inner.lock().quota(username, self.config.fragment_length)
    }

    /// Bytes certified by `username`'s blobs, or [`UNKNOWN_USER`]
    pub fn usage(&self, username: &str) -> i64 {
        self.inner.lock().usage(username, self.config.fragment_length)
    }

    /// `max(0, quota - usage)`; `0` for unknown users
    pub fn remaining_capacity(&self, username: &str) -> i64 {
        self.inner
            .lock()
            .remaining_capacity(username, self.config.fragment_length)
    }

    pub fn storage_node(&self, address: &SocketAddr) -> Option<StorageNodeInfo> {
        let inner = self.inner.lock();
        inner.storage_nodes.get(address).map(|node| StorageNodeInfo {
            owner: node.owner.clone(),
            address: *address,
            fractions: node.fractions.clone(),
            fragment_count: node.committed.len(),
            size_bytes: node.size(self.config.fragment_length),
        })
    }
}

fn check_fractions(fractions: &BTreeMap<String, f64>, tolerance: f64) -> Result<(), Rejection> {
    if fractions.is_empty() {
        return Err(Rejection::InvalidArgument);
    }
    if fractions
        .values()
        .any(|fraction| !fraction.is_finite() || *fraction < 0.0)
    {
        return Err(Rejection::InvalidArgument);
    }
    let sum: f64 = fractions.values().sum();
    // epsilon absorbs rounding at the edges of the band (0.999 - 1.0)
    if (sum - 1.0).abs() > tolerance + f64::EPSILON {
        return Err(Rejection::InvalidArgument);
    }
    Ok(())
}

impl RegistryInner {
    fn register_node(
        &mut self,
        donor: &str,
        address: SocketAddr,
        fractions: BTreeMap<String, f64>,
    ) -> Result<(), Rejection> {
        if !self.is_registered(donor) {
            return Err(Rejection::NotFound);
        }
        if self.storage_nodes.contains_key(&address) {
            return Err(Rejection::Conflict);
        }
        if !fractions.keys().all(|beneficiary| self.is_registered(beneficiary)) {
            return Err(Rejection::NotFound);
        }
        self.insert_node(donor, address, fractions);
        Ok(())
    }

    fn insert_node(&mut self, donor: &str, address: SocketAddr, fractions: BTreeMap<String, f64>) {
        for beneficiary in fractions.keys() {
            self.donations
                .entry(beneficiary.clone())
                .or_default()
                .insert(address);
        }
        self.storage_nodes.insert(
            address,
            StorageNode {
                owner: donor.to_string(),
                fractions,
                committed: HashSet::new(),
            },
        );
    }

    fn commit_fragment(
        &mut self,
        donor: &str,
        address: SocketAddr,
        owner: &str,
        sharer: &PublicKey,
        hash: Hash,
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        if !self.is_registered(donor) || !self.is_registered(owner) {
            return Err(Rejection::NotFound);
        }
        if !self.is_sharer(owner, sharer) {
            return Err(Rejection::Authorization);
        }
        sharer
            .verify(&commit_message(sharer, &hash), signature)
            .map_err(|_| Rejection::Authentication)?;

        if !self.storage_nodes.contains_key(&address) {
            tracing::info!(donor, %address, "storage node registered on first commit");
            self.insert_node(donor, address, BTreeMap::from([(donor.to_string(), 1.0)]));
        }
        let node = self
            .storage_nodes
            .get_mut(&address)
            .ok_or(Rejection::NotFound)?;
        node.committed.insert(hash);
        Ok(())
    }

    fn quota(&self, username: &str, fragment_length: u64) -> i64 {
        let Some(addresses) = self.donations.get(username) else {
            return UNKNOWN_USER;
        };
        addresses
            .iter()
            .filter_map(|address| self.storage_nodes.get(address))
            .map(|node| {
                let fraction = node.fractions.get(username).copied().unwrap_or(0.0);
                // a share that lands on a whole fragment must not lose a byte
                (node.size(fragment_length) as f64 * fraction).round() as i64
            })
            .fold(0i64, i64::saturating_add)
    }

    fn usage(&self, username: &str, fragment_length: u64) -> i64 {
        if !self.is_registered(username) {
            return UNKNOWN_USER;
        }
        let bytes = self
            .certified_fragments(username)
            .saturating_mul(fragment_length);
        i64::try_from(bytes).unwrap_or(i64::MAX)
    }

    pub(super) fn remaining_capacity(&self, username: &str, fragment_length: u64) -> i64 {
        if !self.is_registered(username) {
            return 0;
        }
        let quota = self.quota(username, fragment_length).max(0);
        let usage = self.usage(username, fragment_length).max(0);
        (quota - usage).max(0)
    }
}
