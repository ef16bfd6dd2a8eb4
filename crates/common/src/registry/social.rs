//! Follow requests and sharing keys
//!
//! Becoming a sharing key is a two-phase protocol. Anyone may drop raw key
//! bytes into a user's follow-request mailbox without a signature; the trust
//! point is the owner-signed grant that promotes a key to a confirmed sharing
//! key. Banning reverses the grant and drops every blob written under it.

use std::collections::{BTreeSet, HashSet};

use crate::crypto::PublicKey;

use super::error::{check_username, parse_key, parse_signature, MalformedInput};
use super::verdict::{settle, Rejection, Verdict};
use super::{Registry, RegistryInner};

/// Per-user state owned by the identity registry.
#[derive(Debug, Clone)]
pub(super) struct UserRecord {
    pub(super) key: PublicKey,
    /// Unparsed requester bytes, not necessarily a valid key
    pub(super) follow_requests: HashSet<Vec<u8>>,
    /// Confirmed sharing keys. Blobs exist only under these.
    pub(super) sharers: BTreeSet<PublicKey>,
}

impl UserRecord {
    pub(super) fn new(key: PublicKey) -> Self {
        Self {
            key,
            follow_requests: HashSet::new(),
            sharers: BTreeSet::new(),
        }
    }
}

impl Registry {
    /// Leave `request` in `target`'s follow-request mailbox.
    ///
    /// No signature is required and the bytes are not parsed. Re-sending an
    /// identical request is accepted and leaves a single entry.
    pub fn request_follow(&self, target: &str, request: &[u8]) -> Result<Verdict, MalformedInput> {
        check_username(target)?;

        let mut inner = self.inner.lock();
        let limit = self.config.max_pending_follow_requests;
        let result = inner.request_follow(target, request, limit);
        Ok(settle("request_follow", target, result))
    }

    /// Clear `request` from `target`'s mailbox.
    ///
    /// `signature` must be the target's signature over the request bytes.
    pub fn withdraw_follow_request(
        &self,
        target: &str,
        request: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(target)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let result = inner.withdraw_follow_request(target, request, &signature);
        Ok(settle("withdraw_follow_request", target, result))
    }

    /// The raw entries in `username`'s mailbox, sorted; `None` if the user is
    /// unknown
    pub fn pending_follow_requests(&self, username: &str) -> Option<Vec<Vec<u8>>> {
        let inner = self.inner.lock();
        let user = inner.users.get(username)?;
        let mut requests: Vec<Vec<u8>> = user.follow_requests.iter().cloned().collect();
        requests.sort();
        Some(requests)
    }

    /// Authorize `sharing_key` to write `username`'s metadata.
    ///
    /// `signature` must be the owner's signature over the encoded sharing key.
    /// A matching entry in the owner's mailbox is cleared.
    pub fn grant_sharing(
        &self,
        username: &str,
        sharing_key: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(username)?;
        let key = parse_key(sharing_key)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let result = inner.grant_sharing(username, sharing_key, key, &signature);
        if result.is_ok() {
            tracing::info!(username, sharing_key = %key.fingerprint(), "sharing key granted");
        }
        Ok(settle("grant_sharing", username, result))
    }

    /// Revoke `sharing_key` and drop every blob written under it.
    ///
    /// Same authorization as [`Registry::grant_sharing`]. Certified fragments
    /// of the dropped blobs are announced as releases.
    pub fn ban_sharing(
        &self,
        username: &str,
        sharing_key: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(username)?;
        let key = parse_key(sharing_key)?;
        let signature = parse_signature(signature)?;

        let mut inner = self.inner.lock();
        let result = inner.ban_sharing(username, sharing_key, key, &signature);
        if result.is_ok() {
            tracing::info!(username, sharing_key = %key.fingerprint(), "sharing key banned");
        }
        self.flush_releases(&mut inner);
        Ok(settle("ban_sharing", username, result))
    }

    /// Confirmed sharing keys of `owner` in key order; `None` if the owner is
    /// unknown
    pub fn list_sharing_keys(&self, owner: &str) -> Option<Vec<PublicKey>> {
        let inner = self.inner.lock();
        inner
            .users
            .get(owner)
            .map(|user| user.sharers.iter().copied().collect())
    }
}

impl RegistryInner {
    pub(super) fn is_sharer(&self, owner: &str, key: &PublicKey) -> bool {
        self.users
            .get(owner)
            .is_some_and(|user| user.sharers.contains(key))
    }

    fn request_follow(&mut self, target: &str, request: &[u8], limit: usize) -> Result<(), Rejection> {
        let user = self.users.get_mut(target).ok_or(Rejection::NotFound)?;
        if user.follow_requests.contains(request) {
            return Ok(());
        }
        if user.follow_requests.len() >= limit {
            return Err(Rejection::QuotaExceeded);
        }
        user.follow_requests.insert(request.to_vec());
        Ok(())
    }

    fn withdraw_follow_request(
        &mut self,
        target: &str,
        request: &[u8],
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        let user = self.users.get_mut(target).ok_or(Rejection::NotFound)?;
        if !user.follow_requests.contains(request) {
            return Err(Rejection::NotFound);
        }
        user.key
            .verify(request, signature)
            .map_err(|_| Rejection::Authentication)?;
        user.follow_requests.remove(request);
        Ok(())
    }

    fn grant_sharing(
        &mut self,
        username: &str,
        encoded: &[u8],
        key: PublicKey,
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        let user = self.users.get_mut(username).ok_or(Rejection::NotFound)?;
        user.key
            .verify(encoded, signature)
            .map_err(|_| Rejection::Authentication)?;
        if user.sharers.contains(&key) {
            return Err(Rejection::Conflict);
        }
        user.sharers.insert(key);
        user.follow_requests.remove(encoded);
        Ok(())
    }

    fn ban_sharing(
        &mut self,
        username: &str,
        encoded: &[u8],
        key: PublicKey,
        signature: &ed25519_dalek::Signature,
    ) -> Result<(), Rejection> {
        let user = self.users.get_mut(username).ok_or(Rejection::NotFound)?;
        user.key
            .verify(encoded, signature)
            .map_err(|_| Rejection::Authentication)?;
        if !user.sharers.remove(&key) {
            return Err(Rejection::NotFound);
        }
        self.drop_blobs_under(username, &key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::SecretKey;
    use crate::registry::{Registry, RegistryConfig, Rejection, Verdict};

    fn registry_with(username: &str, key: &SecretKey, config: RegistryConfig) -> Registry {
        let registry = Registry::new(config);
        let verdict = registry
            .claim(
                username,
                &key.public().to_bytes(),
                &key.sign(username.as_bytes()).to_bytes(),
            )
            .unwrap();
        assert!(verdict.is_accepted());
        registry
    }

    #[test]
    fn test_follow_request_mailbox() {
        let alice = SecretKey::generate();
        let registry = registry_with("alice", &alice, RegistryConfig::default());

        // junk bytes are fine, the mailbox is not a capability
        assert!(registry.request_follow("alice", b"junk").unwrap().is_accepted());
        assert!(registry.request_follow("alice", b"junk").unwrap().is_accepted());
        assert_eq!(
            registry.pending_follow_requests("alice"),
            Some(vec![b"junk".to_vec()])
        );
        assert_eq!(
            registry.request_follow("nobody", b"junk").unwrap(),
            Verdict::Rejected(Rejection::NotFound)
        );
        assert_eq!(registry.pending_follow_requests("nobody"), None);
    }

    #[test]
    fn test_follow_request_mailbox_is_bounded() {
        let alice = SecretKey::generate();
        let config = RegistryConfig {
            max_pending_follow_requests: 3,
            ..RegistryConfig::default()
        };
        let registry = registry_with("alice", &alice, config);

        for i in 0..3u8 {
            assert!(registry.request_follow("alice", &[i]).unwrap().is_accepted());
        }
        assert_eq!(
            registry.request_follow("alice", &[9]).unwrap(),
            Verdict::Rejected(Rejection::QuotaExceeded)
        );
        assert_eq!(registry.pending_follow_requests("alice").unwrap().len(), 3);
    }

    #[test]
    fn test_withdraw_follow_request_needs_owner_signature() {
        let alice = SecretKey::generate();
        let registry = registry_with("alice", &alice, RegistryConfig::default());
        let request = SecretKey::generate().public().to_bytes();
        assert!(registry.request_follow("alice", &request).unwrap().is_accepted());

        let stranger = SecretKey::generate();
        assert_eq!(
            registry
                .withdraw_follow_request("alice", &request, &stranger.sign(&request).to_bytes())
                .unwrap(),
            Verdict::Rejected(Rejection::Authentication)
        );

        let signature = alice.sign(&request).to_bytes();
        assert!(registry
            .withdraw_follow_request("alice", &request, &signature)
            .unwrap()
            .is_accepted());
        assert_eq!(
            registry
                .withdraw_follow_request("alice", &request, &signature)
                .unwrap(),
            Verdict::Rejected(Rejection::NotFound)
        );
    }

    #[test]
    fn test_grant_and_ban() {
        let alice = SecretKey::generate();
        let registry = registry_with("alice", &alice, RegistryConfig::default());
        let sharer = SecretKey::generate().public().to_bytes();
        let signature = alice.sign(&sharer).to_bytes();

        assert!(registry.request_follow("alice", &sharer).unwrap().is_accepted());
        assert!(registry
            .grant_sharing("alice", &sharer, &signature)
            .unwrap()
            .is_accepted());
        assert_eq!(
            registry.grant_sharing("alice", &sharer, &signature).unwrap(),
            Verdict::Rejected(Rejection::Conflict)
        );
        // the granted request has left the mailbox
        assert_eq!(registry.pending_follow_requests("alice"), Some(vec![]));
        assert_eq!(registry.list_sharing_keys("alice").unwrap().len(), 1);

        assert!(registry
            .ban_sharing("alice", &sharer, &signature)
            .unwrap()
            .is_accepted());
        assert_eq!(
            registry.ban_sharing("alice", &sharer, &signature).unwrap(),
            Verdict::Rejected(Rejection::NotFound)
        );
        assert_eq!(registry.list_sharing_keys("alice"), Some(vec![]));
    }

    #[test]
    fn test_only_owner_can_grant() {
        let alice = SecretKey::generate();
        let registry = registry_with("alice", &alice, RegistryConfig::default());
        let mallory = SecretKey::generate();
        let sharer = mallory.public().to_bytes();

        assert_eq!(
            registry
                .grant_sharing("alice", &sharer, &mallory.sign(&sharer).to_bytes())
                .unwrap(),
            Verdict::Rejected(Rejection::Authentication)
        );
        assert_eq!(registry.list_sharing_keys("alice"), Some(vec![]));
    }
}
