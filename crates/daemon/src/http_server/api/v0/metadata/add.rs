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
pub struct AddRequest {
    pub owner: String,
    /// Writing sharing key (hex)
    pub sharing_key: String,
    /// Opaque lookup key (base64)
    pub lookup_key: String,
    /// Opaque payload (base64)
    pub payload: String,
    /// Sharing key's signature over the payload (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<AddRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let lookup_key = decode_base64("lookup_key", &req.lookup_key)?;
    let payload = decode_base64("payload", &req.payload)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state.registry().add_metadata_blob(
        &req.owner,
        &sharing_key,
        &lookup_key,
        &payload,
        &signature,
    )?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for AddRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/metadata/add").unwrap();
        client.post(full_url).json(&self)
    }
}
