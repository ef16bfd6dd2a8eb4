//! Shared JSON shapes and byte-field decoding for the v0 API
//!
//! Keys, signatures and fragment hashes travel as hex. Lookup keys,
//! payloads and follow-request entries are opaque and travel as standard
//! base64.

use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use common::prelude::{MalformedInput, Verdict};

/// Answer to every mutating call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub accepted: bool,
    /// Snake-case rejection kind, absent when accepted
    pub reason: Option<String>,
}

impl From<Verdict> for VerdictResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            accepted: verdict.is_accepted(),
            reason: verdict.rejection().map(|r| r.as_str().to_string()),
        }
    }
}

impl std::fmt::Display for VerdictResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            None => write!(f, "accepted"),
            Some(reason) => write!(f, "rejected ({})", reason),
        }
    }
}

/// A request the registry never saw because its fields did not decode
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("field `{0}` is not valid hex")]
    Hex(&'static str),
    #[error("field `{0}` is not valid base64")]
    Base64(&'static str),
    #[error(transparent)]
    Malformed(#[from] MalformedInput),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "malformed request");
        (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, RequestError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).map_err(|_| RequestError::Hex(field))
}

pub fn decode_base64(field: &'static str, value: &str) -> Result<Vec<u8>, RequestError> {
    STANDARD
        .decode(value)
        .map_err(|_| RequestError::Base64(field))
}

pub fn encode_base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use common::prelude::Rejection;

    use super::*;

    #[test]
    fn test_verdict_response_shape() {
        let accepted = serde_json::to_value(VerdictResponse::from(Verdict::Accepted)).unwrap();
        assert_eq!(accepted, serde_json::json!({"accepted": true, "reason": null}));

        let rejected = VerdictResponse::from(Verdict::Rejected(Rejection::QuotaExceeded));
        assert_eq!(rejected.reason.as_deref(), Some("quota_exceeded"));
        assert_eq!(rejected.to_string(), "rejected (quota_exceeded)");
    }

    #[test]
    fn test_decoders_name_the_field() {
        assert_eq!(decode_hex("hash", "0xff00").unwrap(), vec![0xff, 0x00]);
        assert!(matches!(
            decode_hex("signature", "zz"),
            Err(RequestError::Hex("signature"))
        ));
        assert_eq!(decode_base64("payload", &encode_base64(b"doc")).unwrap(), b"doc");
        assert!(matches!(
            decode_base64("payload", "***"),
            Err(RequestError::Base64("payload"))
        ));
    }
}
