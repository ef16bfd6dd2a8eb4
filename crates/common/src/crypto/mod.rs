//! Cryptographic primitives for dirnode
//!
//! The registry never implements a primitive itself. It consumes two
//! capabilities from this module:
//!
//! - **Verification**: Ed25519 [`PublicKey`]s check detached signatures over
//!   the exact bytes a caller claims to have signed.
//! - **Content hashing**: SHA-256 [`Hash`]es identify fragments in the
//!   external fragment store and fingerprint keys for logging.
//!
//! # Signed payloads
//!
//! Every mutating registry call is authorized by a signature over an
//! unambiguous payload:
//!
//! | Operation | Signer | Payload |
//! |---|---|---|
//! | claim | claimed key | username bytes |
//! | remove | bound key | `hash(username)` |
//! | withdraw follow request | owner | request bytes |
//! | grant / ban sharing | owner | sharing key bytes |
//! | add metadata blob | sharing key | payload |
//! | attach fragment hashes | sharing key | `lookup ‖ payload ‖ hashes` |
//! | remove metadata blob | sharing key | lookup key |
//! | commit fragment | sharing key | `sharing key ‖ hash` |
//!
//! [`SecretKey`] exists for clients and tests that need to produce those
//! signatures; the registry itself only ever holds public keys.

mod hash;
mod keys;

pub use ed25519_dalek::Signature;
pub use hash::{hash, Hash, HashError, HASH_SIZE};
pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
