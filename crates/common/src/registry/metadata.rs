//! Metadata blobs written by sharing keys
//!
//! Blobs live in a single arena keyed by `(owner, sharing key, lookup key)`.
//! Ordering the arena by that tuple lets one range scan answer both "every
//! blob of this owner" (usage) and "every blob under this sharing key" (ban).

use crate::crypto::{Hash, PublicKey, PUBLIC_KEY_SIZE};

use super::error::{check_username, parse_key, parse_signature, MalformedInput};
use super::release::FragmentRelease;
use super::verdict::{settle, Rejection, Verdict};
use super::{Registry, RegistryInner};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct BlobKey {
    owner: String,
    sharer: [u8; PUBLIC_KEY_SIZE],
    lookup: Vec<u8>,
}

impl BlobKey {
    fn new(owner: &str, sharer: &PublicKey, lookup: &[u8]) -> Self {
        Self {
            owner: owner.to_string(),
            sharer: sharer.to_bytes(),
            lookup: lookup.to_vec(),
        }
    }

    /// Smallest key under `owner`, optionally narrowed to one sharing key
    fn lower_bound(owner: &str, sharer: Option<&PublicKey>) -> Self {
        Self {
            owner: owner.to_string(),
            sharer: sharer.map(PublicKey::to_bytes).unwrap_or([0; PUBLIC_KEY_SIZE]),
            lookup: Vec::new(),
        }
    }
}

/// One versioned record of user metadata.
///
/// The payload is opaque to the registry (it is encrypted by the owner). A
/// blob is *open* until its fragment hashes are attached; an open blob
/// accounts for no storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlob {
    payload: Vec<u8>,
    fragment_hashes: Option<Vec<Hash>>,
}

impl MetadataBlob {
    fn open(payload: Vec<u8>) -> Self {
        Self {
            payload,
            fragment_hashes: None,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Certified fragment hashes in attachment order, `None` while open
    pub fn fragment_hashes(&self) -> Option<&[Hash]> {
        self.fragment_hashes.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.fragment_hashes.is_none()
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_hashes.as_ref().map_or(0, Vec::len)
    }

    pub fn contains_hash(&self, hash: &Hash) -> bool {
        self.fragment_hashes
            .as_ref()
            .is_some_and(|hashes| hashes.contains(hash))
    }
}

/// The message a sharing key signs to attach hashes:
/// `lookup_key || payload || hashes`
pub fn attach_message(lookup_key: &[u8], payload: &[u8], hashes: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(lookup_key.len() + payload.len() + hashes.len());
    message.extend_from_slice(lookup_key);
    message.extend_from_slice(payload);
    message.extend_from_slice(hashes);
    message
}

impl Registry {
    /// Create an open blob at `lookup_key` under `(owner, sharing_key)`.
    ///
    /// `signature` is the sharing key's signature over `payload`. Insert only:
    /// an existing lookup key is a conflict, never overwritten.
    pub fn add_metadata_blob(
        &self,
        owner: &str,
        sharing_key: &[u8],
        lookup_key: &[u8],
        payload: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(owner)?;
        let sharer = parse_key(sharing_key)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let fragment_length = self.config.fragment_length;
        let result = inner.add_blob(owner, sharer, lookup_key, payload, &signature, fragment_length);
        Ok(settle("add_metadata_blob", owner, result))
    }

    /// Replace the fragment hashes certified by an existing blob.
    ///
    /// `hashes` is the concatenation of fixed-size fragment hashes and
    /// `signature` the sharing key's signature over
    /// [`attach_message`]`(lookup_key, payload, hashes)`. Re-attaching the
    /// same list is accepted and changes nothing.
    pub fn attach_fragment_hashes(
        &self,
        owner: &str,
        sharing_key: &[u8],
        lookup_key: &[u8],
        payload: &[u8],
        hashes: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(owner)?;
        let sharer = parse_key(sharing_key)?;
        let parsed = Hash::split_concatenated(hashes)?;
        let signature = parse_signature(signature)?;

        let message = attach_message(lookup_key, payload, hashes);
        let mut inner = self.inner.lock();
        let fragment_length = self.config.fragment_length;
        let result = inner.attach_hashes(
            owner,
            sharer,
            lookup_key,
            &message,
            parsed,
            &signature,
            fragment_length,
        );
        Ok(settle("attach_fragment_hashes", owner, result))
    }

    /// Delete the blob at `lookup_key`.
    ///
    /// `signature` is the sharing key's signature over `lookup_key`. Any
    /// fragments the blob certified are announced as released.
    pub fn remove_metadata_blob(
        &self,
        owner: &str,
        sharing_key: &[u8],
        lookup_key: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(owner)?;
        let sharer = parse_key(sharing_key)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let result = inner.remove_blob(owner, sharer, lookup_key, &signature);
        self.flush_releases(&mut inner);
        Ok(settle("remove_metadata_blob", owner, result))
    }

    /// Whether the fragment store may persist the fragment `hash` for the
    /// blob at `lookup_key`
    pub fn is_fragment_allowed(
        &self,
        owner: &str,
        sharing_key: &[u8],
        lookup_key: &[u8],
        hash: &[u8],
    ) -> Result<bool, MalformedInput> {
        let sharer = parse_key(sharing_key)?;
        let hash = Hash::try_from(hash)?;

        let inner = self.inner.lock();
        if !inner.is_sharer(owner, &sharer) {
            return Ok(false);
        }
        Ok(inner
            .blobs
            .get(&BlobKey::new(owner, &sharer, lookup_key))
            .is_some_and(|blob| blob.contains_hash(&hash)))
    }

    pub fn get_metadata_blob(
        &self,
        owner: &str,
        sharing_key: &[u8],
        lookup_key: &[u8],
    ) -> Result<Option<MetadataBlob>, MalformedInput> {
        let sharer = parse_key(sharing_key)?;
        let inner = self.inner.lock();
        Ok(inner
            .blobs
            .get(&BlobKey::new(owner, &sharer, lookup_key))
            .cloned())
    }
}

impl RegistryInner {
    /// Owner exists, `sharer` is one of its confirmed sharing keys and signed
    /// `message`
    fn authorize_sharer(
        &self,
        owner: &str,
        sharer: &PublicKey,
        message: &[u8],
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        if !self.is_registered(owner) {
            return Err(Rejection::NotFound);
        }
        if !self.is_sharer(owner, sharer) {
            return Err(Rejection::Authorization);
        }
        sharer
            .verify(message, signature)
            .map_err(|_| Rejection::Authentication)
    }

    fn add_blob(
        &mut self,
        owner: &str,
        sharer: PublicKey,
        lookup_key: &[u8],
        payload: &[u8],
        signature: &ed25519_dalek::Signature,
        fragment_length: u64,
    ) -> Result<(), Rejection> {
        self.authorize_sharer(owner, &sharer, payload, signature)?;
        self.require_capacity(owner, fragment_length)?;

        let key = BlobKey::new(owner, &sharer, lookup_key);
        if self.blobs.contains_key(&key) {
            return Err(Rejection::Conflict);
        }
        self.blobs.insert(key, MetadataBlob::open(payload.to_vec()));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn attach_hashes(
        &mut self,
        owner: &str,
        sharer: PublicKey,
        lookup_key: &[u8],
        message: &[u8],
        hashes: Vec<Hash>,
        signature: &ed25519_dalek::Signature,
        fragment_length: u64,
    ) -> Result<(), Rejection> {
        self.authorize_sharer(owner, &sharer, message, signature)?;
        let key = BlobKey::new(owner, &sharer, lookup_key);
        if !self.blobs.contains_key(&key) {
            return Err(Rejection::NotFound);
        }
        self.require_capacity(owner, fragment_length)?;

        let blob = self.blobs.get_mut(&key).ok_or(Rejection::NotFound)?;
        blob.fragment_hashes = Some(hashes);
        Ok(())
    }

    fn remove_blob(
        &mut self,
        owner: &str,
        sharer: PublicKey,
        lookup_key: &[u8],
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        self.authorize_sharer(owner, &sharer, lookup_key, signature)?;
        let blob = self
            .blobs
            .remove(&BlobKey::new(owner, &sharer, lookup_key))
            .ok_or(Rejection::NotFound)?;
        if let Some(hashes) = blob.fragment_hashes {
            self.queue_release(owner, sharer, hashes);
        }
        Ok(())
    }

    fn require_capacity(&self, owner: &str, fragment_length: u64) -> Result<(), Rejection> {
        let needed = i64::try_from(fragment_length).unwrap_or(i64::MAX);
        if self.remaining_capacity(owner, fragment_length) < needed {
            return Err(Rejection::QuotaExceeded);
        }
        Ok(())
    }

    fn blobs_of<'a>(
        &'a self,
        owner: &'a str,
        sharer: Option<&'a PublicKey>,
    ) -> impl Iterator<Item = (&'a BlobKey, &'a MetadataBlob)> + 'a {
        let narrow = sharer.map(PublicKey::to_bytes);
        self.blobs
            .range(BlobKey::lower_bound(owner, sharer)..)
            .take_while(move |(key, _)| {
                key.owner == owner && narrow.map_or(true, |bytes| key.sharer == bytes)
            })
    }

    /// Number of fragments certified by every blob `owner` holds
    pub(super) fn certified_fragments(&self, owner: &str) -> u64 {
        self.blobs_of(owner, None)
            .map(|(_, blob)| blob.fragment_count() as u64)
            .sum()
    }

    /// Drop every blob under `(owner, sharer)`, releasing their fragments.
    pub(super) fn drop_blobs_under(&mut self, owner: &str, sharer: &PublicKey) {
        let keys: Vec<BlobKey> = self
            .blobs_of(owner, Some(sharer))
            .map(|(key, _)| key.clone())
            .collect();

        let mut hashes = Vec::new();
        for key in keys {
            if let Some(blob) = self.blobs.remove(&key) {
                hashes.extend(blob.fragment_hashes.unwrap_or_default());
            }
        }
        self.queue_release(owner, *sharer, hashes);
    }

    fn queue_release(&mut self, owner: &str, sharing_key: PublicKey, hashes: Vec<Hash>) {
        if hashes.is_empty() {
            return;
        }
        self.outbox.push(FragmentRelease {
            owner: owner.to_string(),
            sharing_key,
            hashes,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::net::SocketAddr;

    use super::attach_message;
    use crate::crypto::{hash, Hash, SecretKey};
    use crate::registry::{Registry, RegistryConfig, Rejection, Verdict};

    const FRAGMENT_LENGTH: u64 = 1024;

    struct Fixture {
        registry: Registry,
        releases: crate::registry::ReleaseReceiver,
        owner: SecretKey,
        sharer: SecretKey,
    }

    impl Fixture {
        /// `alice` with one granted sharing key and room for `fragments`
        fn new(fragments: usize) -> Self {
            let (registry, releases) = Registry::with_releases(RegistryConfig {
                fragment_length: FRAGMENT_LENGTH,
                ..RegistryConfig::default()
            });
            let owner = SecretKey::generate();
            let sharer = SecretKey::generate();
            let key = owner.public().to_bytes();
            assert!(registry
                .claim("alice", &key, &owner.sign(b"alice").to_bytes())
                .unwrap()
                .is_accepted());
            let sharer_bytes = sharer.public().to_bytes();
            assert!(registry
                .grant_sharing("alice", &sharer_bytes, &owner.sign(&sharer_bytes).to_bytes())
                .unwrap()
                .is_accepted());

            let fixture = Self {
                registry,
                releases,
                owner,
                sharer,
            };
            fixture.donate(fragments);
            fixture
        }

        fn donate(&self, fragments: usize) {
            let addr: SocketAddr = "10.0.0.1:4001".parse().unwrap();
            let fractions = BTreeMap::from([("alice".to_string(), 1.0)]);
            let _ = self
                .registry
                .register_storage_node("alice", addr, &fractions)
                .unwrap();
            let sharer_bytes = self.sharer.public().to_bytes();
            for i in 0..fragments {
                let fragment = hash(format!("donated-{i}").as_bytes());
                let mut message = sharer_bytes.to_vec();
                message.extend_from_slice(fragment.as_bytes());
                assert!(self
                    .registry
                    .register_fragment_commit(
                        "alice",
                        addr,
                        "alice",
                        &sharer_bytes,
                        fragment.as_bytes(),
                        &self.sharer.sign(&message).to_bytes(),
                    )
                    .unwrap()
                    .is_accepted());
            }
        }

        fn add(&self, lookup: &[u8], payload: &[u8]) -> Verdict {
            self.registry
                .add_metadata_blob(
                    "alice",
                    &self.sharer.public().to_bytes(),
                    lookup,
                    payload,
                    &self.sharer.sign(payload).to_bytes(),
                )
                .unwrap()
        }

        fn attach(&self, lookup: &[u8], payload: &[u8], hashes: &[Hash]) -> Verdict {
            let concatenated: Vec<u8> = hashes.iter().flat_map(|h| *h.as_bytes()).collect();
            let message = attach_message(lookup, payload, &concatenated);
            self.registry
                .attach_fragment_hashes(
                    "alice",
                    &self.sharer.public().to_bytes(),
                    lookup,
                    payload,
                    &concatenated,
                    &self.sharer.sign(&message).to_bytes(),
                )
                .unwrap()
        }
    }

    #[test]
    fn test_add_requires_confirmed_sharer() {
        let fixture = Fixture::new(4);
        let stranger = SecretKey::generate();

        let verdict = fixture
            .registry
            .add_metadata_blob(
                "alice",
                &stranger.public().to_bytes(),
                b"doc",
                b"payload",
                &stranger.sign(b"payload").to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authorization));

        // the owner's own key is not a sharing key until granted
        let verdict = fixture
            .registry
            .add_metadata_blob(
                "alice",
                &fixture.owner.public().to_bytes(),
                b"doc",
                b"payload",
                &fixture.owner.sign(b"payload").to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authorization));
    }

    #[test]
    fn test_add_is_insert_only() {
        let fixture = Fixture::new(4);
        assert!(fixture.add(b"doc", b"first").is_accepted());
        assert_eq!(
            fixture.add(b"doc", b"second"),
            Verdict::Rejected(Rejection::Conflict)
        );

        let blob = fixture
            .registry
            .get_metadata_blob("alice", &fixture.sharer.public().to_bytes(), b"doc")
            .unwrap()
            .unwrap();
        assert_eq!(blob.payload(), b"first");
        assert!(blob.is_open());
    }

    #[test]
    fn test_add_without_capacity_is_rejected() {
        let fixture = Fixture::new(0);
        assert_eq!(
            fixture.add(b"doc", b"payload"),
            Verdict::Rejected(Rejection::QuotaExceeded)
        );
    }

    #[test]
    fn test_attach_binds_to_lookup_key() {
        let fixture = Fixture::new(4);
        let hashes = [hash(b"h1"), hash(b"h2")];
        assert!(fixture.add(b"doc", b"payload").is_accepted());

        // signature over a different lookup key does not carry over
        let concatenated: Vec<u8> = hashes.iter().flat_map(|h| *h.as_bytes()).collect();
        let forged = attach_message(b"other", b"payload", &concatenated);
        let verdict = fixture
            .registry
            .attach_fragment_hashes(
                "alice",
                &fixture.sharer.public().to_bytes(),
                b"doc",
                b"payload",
                &concatenated,
                &fixture.sharer.sign(&forged).to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authentication));

        assert!(fixture.attach(b"doc", b"payload", &hashes).is_accepted());
        let sharer = fixture.sharer.public().to_bytes();
        assert!(fixture
            .registry
            .is_fragment_allowed("alice", &sharer, b"doc", hashes[0].as_bytes())
            .unwrap());
        assert!(!fixture
            .registry
            .is_fragment_allowed("alice", &sharer, b"doc", hash(b"h3").as_bytes())
            .unwrap());
    }

    #[test]
    fn test_attach_to_missing_blob() {
        let fixture = Fixture::new(4);
        assert_eq!(
            fixture.attach(b"ghost", b"payload", &[hash(b"h1")]),
            Verdict::Rejected(Rejection::NotFound)
        );
    }

    #[test]
    fn test_attach_rejects_ragged_hash_list() {
        let fixture = Fixture::new(4);
        assert!(fixture.add(b"doc", b"payload").is_accepted());
        let result = fixture.registry.attach_fragment_hashes(
            "alice",
            &fixture.sharer.public().to_bytes(),
            b"doc",
            b"payload",
            &[7u8; 33],
            &fixture.sharer.sign(b"whatever").to_bytes(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_releases_certified_fragments() {
        let fixture = Fixture::new(4);
        let hashes = vec![hash(b"h1"), hash(b"h2")];
        assert!(fixture.add(b"doc", b"payload").is_accepted());
        assert!(fixture.attach(b"doc", b"payload", &hashes).is_accepted());

        let sharer = fixture.sharer.public().to_bytes();
        let signature = fixture.sharer.sign(b"doc").to_bytes();
        assert!(fixture
            .registry
            .remove_metadata_blob("alice", &sharer, b"doc", &signature)
            .unwrap()
            .is_accepted());
        assert_eq!(
            fixture
                .registry
                .remove_metadata_blob("alice", &sharer, b"doc", &signature)
                .unwrap(),
            Verdict::Rejected(Rejection::NotFound)
        );

        let release = fixture.releases.try_recv().unwrap();
        assert_eq!(release.owner, "alice");
        assert_eq!(release.sharing_key, fixture.sharer.public());
        assert_eq!(release.hashes, hashes);
        assert!(fixture.releases.try_recv().is_err());
    }

    #[test]
    fn test_open_blob_release_is_silent() {
        let fixture = Fixture::new(4);
        assert!(fixture.add(b"doc", b"payload").is_accepted());
        let sharer = fixture.sharer.public().to_bytes();
        assert!(fixture
            .registry
            .remove_metadata_blob("alice", &sharer, b"doc", &fixture.sharer.sign(b"doc").to_bytes())
            .unwrap()
            .is_accepted());
        assert!(fixture.releases.try_recv().is_err());
    }

    #[test]
    fn test_ban_drops_only_that_sharers_blobs() {
        let fixture = Fixture::new(8);
        let second = SecretKey::generate();
        let second_bytes = second.public().to_bytes();
        assert!(fixture
            .registry
            .grant_sharing(
                "alice",
                &second_bytes,
                &fixture.owner.sign(&second_bytes).to_bytes()
            )
            .unwrap()
            .is_accepted());

        assert!(fixture.add(b"doc", b"payload").is_accepted());
        assert!(fixture
            .attach(b"doc", b"payload", &[hash(b"h1")])
            .is_accepted());
        assert!(fixture
            .registry
            .add_metadata_blob(
                "alice",
                &second_bytes,
                b"doc",
                b"other",
                &second.sign(b"other").to_bytes()
            )
            .unwrap()
            .is_accepted());

        let sharer = fixture.sharer.public().to_bytes();
        assert!(fixture
            .registry
            .ban_sharing("alice", &sharer, &fixture.owner.sign(&sharer).to_bytes())
            .unwrap()
            .is_accepted());

        assert_eq!(
            fixture
                .registry
                .get_metadata_blob("alice", &sharer, b"doc")
                .unwrap(),
            None
        );
        assert!(fixture
            .registry
            .get_metadata_blob("alice", &second_bytes, b"doc")
            .unwrap()
            .is_some());
        assert_eq!(fixture.releases.try_recv().unwrap().hashes, vec![hash(b"h1")]);
    }
}
