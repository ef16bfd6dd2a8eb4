use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_hex, RequestError, VerdictResponse};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRequest {
    pub username: String,
    /// Key being authorized to write `username`'s metadata (hex)
    pub sharing_key: String,
    /// Owner's signature over the encoded sharing key (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<GrantRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state
        .registry()
        .grant_sharing(&req.username, &sharing_key, &signature)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for GrantRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/sharing/grant").unwrap();
        client.post(full_url).json(&self)
    }
}
