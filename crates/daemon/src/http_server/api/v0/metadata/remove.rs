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
pub struct RemoveRequest {
    pub owner: String,
    pub sharing_key: String,
    pub lookup_key: String,
    /// Sharing key's signature over the lookup key (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RemoveRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let lookup_key = decode_base64("lookup_key", &req.lookup_key)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state.registry().remove_metadata_blob(
        &req.owner,
        &sharing_key,
        &lookup_key,
        &signature,
    )?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for RemoveRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/metadata/remove").unwrap();
        client.post(full_url).json(&self)
    }
}
