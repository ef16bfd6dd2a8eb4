use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_hex, RequestError, VerdictResponse};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub username: String,
    /// Ed25519 public key (hex)
    pub public_key: String,
    /// The key's signature over the raw username bytes (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ClaimRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let public_key = decode_hex("public_key", &req.public_key)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state
        .registry()
        .claim(&req.username, &public_key, &signature)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for ClaimRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/user/claim").unwrap();
        client.post(full_url).json(&self)
    }
}

#[cfg(test)]
mod tests {
    use common::prelude::SecretKey;
    use http::StatusCode;

    use super::*;
    use crate::ServiceConfig;

    #[tokio::test]
    async fn test_handler_direct() {
        let (state, _releases) = ServiceState::from_config(&ServiceConfig::default());
        let key = SecretKey::generate();

        let req = ClaimRequest {
            username: "alice".to_string(),
            public_key: key.public().to_hex(),
            signature: hex::encode(key.sign(b"alice").to_bytes()),
        };
        let response = handler(State(state.clone()), Json(req.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.registry().lookup_key("alice"), Some(key.public()));

        let truncated = ClaimRequest {
            public_key: req.public_key[..10].to_string(),
            ..req
        };
        let response = handler(State(state), Json(truncated))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
