//! Username ↔ public key bindings
//!
//! Usernames and keys are each globally unique and, while registered,
//! mutually bijective. A key may only hold one username at a time.

use crate::crypto::PublicKey;

use super::error::{check_username, parse_key, parse_signature, MalformedInput};
use super::social::UserRecord;
use super::verdict::{settle, Rejection, Verdict};
use super::{Registry, RegistryInner};

impl Registry {
    /// Claim `username` for the key encoded in `public_key`.
    ///
    /// `signature` must be the key's signature over the raw username bytes.
    pub fn claim(
        &self,
        username: &str,
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(username)?;
        let key = parse_key(public_key)?;
        let signature = parse_signature(signature)?;

        if key.verify(username.as_bytes(), &signature).is_err() {
            return Ok(settle("claim", username, Err(Rejection::Authentication)));
        }

        let mut inner = self.inner.lock();
        let result = inner.claim(username, key);
        if result.is_ok() {
            tracing::info!(username, key = %key.fingerprint(), "username claimed");
        }
        Ok(settle("claim", username, result))
    }

    /// The key currently bound to `username`, if any
    pub fn lookup_key(&self, username: &str) -> Option<PublicKey> {
        self.inner.lock().users.get(username).map(|user| user.key)
    }

    /// The username currently bound to the encoded key, if any
    pub fn lookup_username(&self, public_key: &[u8]) -> Result<Option<String>, MalformedInput> {
        let key = parse_key(public_key)?;
        Ok(self.inner.lock().usernames.get(&key).cloned())
    }

    /// Give up `username`.
    ///
    /// `signature` must be the bound key's signature over `hash(username)`.
    /// Removal cascades: the user's blobs and donation index entry go away,
    /// and their key is scrubbed from every other user's sharing keys and
    /// follow-request mailbox. Storage nodes the user pledged stay registered.
    pub fn remove(
        &self,
        username: &str,
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<Verdict, MalformedInput> {
        check_username(username)?;
        let key = parse_key(public_key)?;
        let signature = parse_signature(signature)?;

        if key.verify_digest(username.as_bytes(), &signature).is_err() {
            return Ok(settle("remove", username, Err(Rejection::Authentication)));
        }

        let mut inner = self.inner.lock();
        let result = inner.remove_user(username, &key);
        if result.is_ok() {
            tracing::info!(username, key = %key.fingerprint(), "username removed");
        }
        self.flush_releases(&mut inner);
        Ok(settle("remove", username, result))
    }
}

impl RegistryInner {
    pub(super) fn is_registered(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    fn claim(&mut self, username: &str, key: PublicKey) -> Result<(), Rejection> {
        if self.users.contains_key(username) || self.usernames.contains_key(&key) {
            return Err(Rejection::Conflict);
        }

        self.users
            .insert(username.to_string(), UserRecord::new(key));
        self.usernames.insert(key, username.to_string());
        self.donations.entry(username.to_string()).or_default();
        Ok(())
    }

    fn remove_user(&mut self, username: &str, key: &PublicKey) -> Result<(), Rejection> {
        let bound = self.users.get(username).ok_or(Rejection::NotFound)?.key;
        if bound != *key {
            return Err(Rejection::Authorization);
        }

        let Some(record) = self.users.remove(username) else {
            return Err(Rejection::NotFound);
        };
        self.usernames.remove(&record.key);
        self.donations.remove(username);
        for sharer in &record.sharers {
            self.drop_blobs_under(username, sharer);
        }

        // scrub the departed identity from everyone else's graph
        let key_bytes = record.key.to_bytes().to_vec();
        let mut followed = Vec::new();
        for (owner, user) in self.users.iter_mut() {
            user.follow_requests.remove(&key_bytes);
            if user.sharers.remove(&record.key) {
                followed.push(owner.clone());
            }
        }
        for owner in followed {
            self.drop_blobs_under(&owner, &record.key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::SecretKey;
    use crate::registry::{Registry, Rejection, Verdict};

    fn claim(registry: &Registry, username: &str, key: &SecretKey) -> Verdict {
        registry
            .claim(
                username,
                &key.public().to_bytes(),
                &key.sign(username.as_bytes()).to_bytes(),
            )
            .unwrap()
    }

    #[test]
    fn test_claim_and_lookup() {
        let registry = Registry::default();
        let alice = SecretKey::generate();

        assert_eq!(claim(&registry, "alice", &alice), Verdict::Accepted);
        assert_eq!(registry.lookup_key("alice"), Some(alice.public()));
        assert_eq!(
            registry
                .lookup_username(&alice.public().to_bytes())
                .unwrap()
                .as_deref(),
            Some("alice")
        );
        assert_eq!(registry.lookup_key("bob"), None);
    }

    #[test]
    fn test_claim_requires_signature_over_username() {
        let registry = Registry::default();
        let alice = SecretKey::generate();

        let verdict = registry
            .claim(
                "alice",
                &alice.public().to_bytes(),
                &alice.sign(b"mallory").to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authentication));
        assert_eq!(registry.lookup_key("alice"), None);
    }

    #[test]
    fn test_key_cannot_hold_two_usernames() {
        let registry = Registry::default();
        let alice = SecretKey::generate();

        assert!(claim(&registry, "alice", &alice).is_accepted());
        assert_eq!(
            claim(&registry, "alice2", &alice),
            Verdict::Rejected(Rejection::Conflict)
        );
        assert_eq!(registry.lookup_key("alice2"), None);
    }

    #[test]
    fn test_remove_requires_digest_signature_from_bound_key() {
        let registry = Registry::default();
        let alice = SecretKey::generate();
        let mallory = SecretKey::generate();
        assert!(claim(&registry, "alice", &alice).is_accepted());

        // plain signature over the username is the claim payload, not removal
        let verdict = registry
            .remove(
                "alice",
                &alice.public().to_bytes(),
                &alice.sign(b"alice").to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authentication));

        // a valid digest signature from some other key is not enough
        let verdict = registry
            .remove(
                "alice",
                &mallory.public().to_bytes(),
                &mallory.sign_digest(b"alice").to_bytes(),
            )
            .unwrap();
        assert_eq!(verdict, Verdict::Rejected(Rejection::Authorization));
        assert_eq!(registry.lookup_key("alice"), Some(alice.public()));

        let verdict = registry
            .remove(
                "alice",
                &alice.public().to_bytes(),
                &alice.sign_digest(b"alice").to_bytes(),
            )
            .unwrap();
        assert!(verdict.is_accepted());
        assert_eq!(registry.lookup_key("alice"), None);
        assert_eq!(
            registry.lookup_username(&alice.public().to_bytes()).unwrap(),
            None
        );

        // the name and key are both free again
        assert!(claim(&registry, "alice", &alice).is_accepted());
    }

    #[test]
    fn test_malformed_key_is_a_fault() {
        let registry = Registry::default();
        let alice = SecretKey::generate();
        let result = registry.claim("alice", &[1, 2, 3], &alice.sign(b"alice").to_bytes());
        assert!(result.is_err());
        assert!(registry.lookup_username(&[0u8; 7]).is_err());
    }
}
