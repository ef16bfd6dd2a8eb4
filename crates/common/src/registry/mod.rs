//! The trust and directory registry
//!
//! One authoritative, in-memory registry that decides whether signed
//! requests are accepted. It is made of four cooperating parts that share a
//! single state struct:
//!
//! - **Identity** ([`identity`]): the username ↔ public key bijection
//! - **Social graph** ([`social`]): pending follow requests and the confirmed
//!   sharing keys allowed to write a user's metadata
//! - **Metadata store** ([`metadata`]): per-(owner, sharing key) metadata
//!   blobs and the fragment hashes each blob certifies
//! - **Quota ledger** ([`quota`]): storage-node donation pledges, quota and
//!   usage accounting that gates every metadata write
//!
//! # Concurrency
//!
//! All state sits behind one mutex. Every operation, reads included, holds
//! the lock for its whole duration, so no two operations interleave and the
//! cross-structure invariants (identity bijection, "blobs exist only for
//! confirmed sharing keys") never need to be re-derived. Nothing inside the
//! lock waits on I/O: signature checks are pure computation and fragment
//! releases go out on an unbounded channel.
//!
//! # Results
//!
//! Mutating calls return `Result<Verdict, MalformedInput>`. A [`Verdict`] is
//! the expected accept/reject answer; [`MalformedInput`] is reserved for
//! structurally invalid arguments (an undecodable key, a signature of the
//! wrong length) that the transport should have caught.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::crypto::PublicKey;

mod config;
mod error;
mod identity;
mod metadata;
mod quota;
mod release;
mod social;
mod verdict;

pub use config::{
    RegistryConfig, DEFAULT_FRACTION_TOLERANCE, DEFAULT_FRAGMENT_LENGTH,
    DEFAULT_MAX_PENDING_FOLLOW_REQUESTS,
};
pub use error::MalformedInput;
pub use metadata::{attach_message, MetadataBlob};
pub use quota::{commit_message, StorageNodeInfo, UNKNOWN_USER};
pub use release::{FragmentRelease, ReleaseReceiver, ReleaseSender};
pub use verdict::{Rejection, Verdict};

use metadata::BlobKey;
use quota::StorageNode;
use social::UserRecord;

/// Handle to the shared registry.
///
/// Cheap to clone; every clone refers to the same state.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<Mutex<RegistryInner>>,
    config: Arc<RegistryConfig>,
    releases: Option<ReleaseSender>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// username -> user record (bound key, mailbox, sharing keys)
    users: HashMap<String, UserRecord>,
    /// bound key -> username, the reverse half of the bijection
    usernames: HashMap<PublicKey, String>,
    /// (owner, sharing key, lookup key) -> blob
    blobs: BTreeMap<BlobKey, MetadataBlob>,
    /// storage node address -> donation pledge
    storage_nodes: HashMap<SocketAddr, StorageNode>,
    /// username -> addresses of nodes granting that user a fraction
    donations: HashMap<String, HashSet<SocketAddr>>,
    /// releases produced by the current operation, flushed before unlock
    outbox: Vec<FragmentRelease>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner::default())),
            config: Arc::new(config),
            releases: None,
        }
    }

    /// Create a registry that announces dropped fragments on the returned
    /// channel.
    pub fn with_releases(config: RegistryConfig) -> (Self, ReleaseReceiver) {
        let (tx, rx) = flume::unbounded();
        let mut registry = Self::new(config);
        registry.releases = Some(tx);
        (registry, rx)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Hand queued releases to the channel. Called with the lock held so
    /// releases leave in the same order their operations were serialized.
    fn flush_releases(&self, inner: &mut RegistryInner) {
        for release in inner.outbox.drain(..) {
            tracing::info!(
                owner = %release.owner,
                sharing_key = %release.sharing_key.fingerprint(),
                fragments = release.hashes.len(),
                "releasing fragments"
            );
            if let Some(tx) = &self.releases {
                // the receiver going away only means nobody is listening
                let _ = tx.send(release);
            }
        }
    }
}
