use crate::crypto::{HashError, KeyError, PublicKey, Signature, SIGNATURE_SIZE};

/// Structurally invalid input that should never have reached the registry.
///
/// Unlike a [`Rejection`](super::Rejection), this is a fault in the caller:
/// the transport layer is expected to reject such requests before decoding
/// them into registry calls, so it is surfaced as an `Err` rather than folded
/// into a verdict.
#[derive(Debug, thiserror::Error)]
pub enum MalformedInput {
    #[error("malformed public key: {0}")]
    PublicKey(#[from] KeyError),
    #[error("malformed signature: expected {SIGNATURE_SIZE} bytes, got {0}")]
    Signature(usize),
    #[error("malformed fragment hash: {0}")]
    Hash(#[from] HashError),
    #[error("malformed username: {0:?}")]
    Username(String),
}

pub(crate) fn parse_key(bytes: &[u8]) -> Result<PublicKey, MalformedInput> {
    Ok(PublicKey::try_from(bytes)?)
}

pub(crate) fn parse_signature(bytes: &[u8]) -> Result<Signature, MalformedInput> {
    Signature::from_slice(bytes).map_err(|_| MalformedInput::Signature(bytes.len()))
}

/// Usernames must be non-empty and printable
pub(crate) fn check_username(username: &str) -> Result<(), MalformedInput> {
    if username.is_empty() || username.chars().any(char::is_control) {
        return Err(MalformedInput::Username(username.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretKey;

    #[test]
    fn test_parse_signature_checks_length() {
        let signature = SecretKey::generate().sign(b"payload");
        assert!(parse_signature(&signature.to_bytes()).is_ok());
        assert!(matches!(
            parse_signature(&[0u8; 12]),
            Err(MalformedInput::Signature(12))
        ));
    }

    #[test]
    fn test_check_username() {
        assert!(check_username("alice").is_ok());
        assert!(check_username("alice smith").is_ok());
        assert!(check_username("").is_err());
        assert!(check_username("ali\nce").is_err());
    }
}
