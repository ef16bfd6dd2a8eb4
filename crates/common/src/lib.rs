/**
 * Cryptographic types and operations.
 *  - Ed25519 public and secret key wrappers
 *  - SHA-256 fragment hashes
 */
pub mod crypto;
/**
 * The trust and directory registry.
 *  Usernames, sharing keys, metadata blobs
 *  and the storage quota that gates them,
 *  all behind a single lock.
 */
pub mod registry;

pub mod prelude {
    pub use crate::crypto::{hash, Hash, PublicKey, SecretKey, Signature};
    pub use crate::registry::{
        attach_message, commit_message, FragmentRelease, MalformedInput, MetadataBlob, Registry,
        RegistryConfig, Rejection, StorageNodeInfo, Verdict, UNKNOWN_USER,
    };
}
