use sha2::{Digest, Sha256};

/// Size of a SHA-256 content hash in bytes
pub const HASH_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hash size, expected {HASH_SIZE}, got {0}")]
    InvalidSize(usize),
    #[error("hash hex decode error")]
    Hex,
}

/// Hash `data` with SHA-256
pub fn hash(data: &[u8]) -> Hash {
    Hash(Sha256::digest(data).into())
}

/// A fixed-size content hash.
///
/// Fragments in the external store are addressed by this hash, and metadata
/// blobs certify fragments by listing them as a flat concatenation of
/// `HASH_SIZE`-byte hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; HASH_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|_| HashError::Hex)?;
        Ok(Self(buff))
    }

    /// Split a concatenated hash list into individual hashes.
    ///
    /// Fails if the list length is not a multiple of [`HASH_SIZE`].
    pub fn split_concatenated(bytes: &[u8]) -> Result<Vec<Hash>, HashError> {
        if bytes.len() % HASH_SIZE != 0 {
            return Err(HashError::InvalidSize(bytes.len()));
        }
        bytes
            .chunks_exact(HASH_SIZE)
            .map(Hash::try_from)
            .collect()
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Hash {
    type Error = HashError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let buff: [u8; HASH_SIZE] = bytes
            .try_into()
            .map_err(|_| HashError::InvalidSize(bytes.len()))?;
        Ok(Self(buff))
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
