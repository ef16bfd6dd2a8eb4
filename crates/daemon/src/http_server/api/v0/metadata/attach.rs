use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{
    decode_base64, decode_hex, RequestError, VerdictResponse,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachRequest {
    pub owner: String,
    /// Writing sharing key (hex)
    pub sharing_key: String,
    /// Lookup key of an existing blob (base64)
    pub lookup_key: String,
    /// Payload covered by the signature (base64)
    pub payload: String,
    /// Fragment hashes in order (hex each)
    pub fragment_hashes: Vec<String>,
    /// Signature over `lookup_key || payload || hashes` (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<AttachRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let lookup_key = decode_base64("lookup_key", &req.lookup_key)?;
    let payload = decode_base64("payload", &req.payload)?;
    let signature = decode_hex("signature", &req.signature)?;

    // The registry splits and length-checks the concatenation
    let mut hashes = Vec::with_capacity(req.fragment_hashes.len() * 32);
    for hash in &req.fragment_hashes {
        hashes.extend(decode_hex("fragment_hashes", hash)?);
    }

    let verdict = state.registry().attach_fragment_hashes(
        &req.owner,
        &sharing_key,
        &lookup_key,
        &payload,
        &hashes,
        &signature,
    )?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for AttachRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/metadata/attach").unwrap();
        client.post(full_url).json(&self)
    }
}
