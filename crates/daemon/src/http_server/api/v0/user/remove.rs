use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_hex, RequestError, VerdictResponse};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub username: String,
    /// The key currently bound to `username` (hex)
    pub public_key: String,
    /// Signature over the SHA-256 of the username (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RemoveRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let public_key = decode_hex("public_key", &req.public_key)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state
        .registry()
        .remove(&req.username, &public_key, &signature)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for RemoveRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/user/remove").unwrap();
        client.post(full_url).json(&self)
    }
}
