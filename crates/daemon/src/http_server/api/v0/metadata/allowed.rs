use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_base64, decode_hex, RequestError};
use crate::ServiceState;

/// Asked by the fragment store before it persists a fragment
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct AllowedRequest {
    #[arg(long)]
    pub owner: String,
    /// Writing sharing key (hex)
    #[arg(long)]
    pub sharing_key: String,
    /// Lookup key (base64)
    #[arg(long)]
    pub lookup_key: String,
    /// Fragment hash (hex)
    #[arg(long)]
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowedResponse {
    pub allowed: bool,
}

impl std::fmt::Display for AllowedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.allowed {
            write!(f, "allowed")
        } else {
            write!(f, "not allowed")
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<AllowedRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let lookup_key = decode_base64("lookup_key", &req.lookup_key)?;
    let hash = decode_hex("hash", &req.hash)?;

    let allowed = state
        .registry()
        .is_fragment_allowed(&req.owner, &sharing_key, &lookup_key, &hash)?;
    Ok(Json(AllowedResponse { allowed }))
}

impl ApiRequest for AllowedRequest {
    type Response = AllowedResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/metadata/allowed").unwrap();
        client.post(full_url).json(&self)
    }
}
