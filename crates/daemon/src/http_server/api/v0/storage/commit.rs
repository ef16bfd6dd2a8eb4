use std::net::SocketAddr;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_hex, RequestError, VerdictResponse};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    pub donor: String,
    pub address: SocketAddr,
    pub owner: String,
    /// Sharing key that wrote the fragment (hex)
    pub sharing_key: String,
    /// Fragment hash (hex)
    pub hash: String,
    /// Signature over `sharing_key || hash` (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CommitRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let hash = decode_hex("hash", &req.hash)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state.registry().register_fragment_commit(
        &req.donor,
        req.address,
        &req.owner,
        &sharing_key,
        &hash,
        &signature,
    )?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for CommitRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/storage/commit").unwrap();
        client.post(full_url).json(&self)
    }
}
