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
pub struct WithdrawRequest {
    pub target: String,
    /// The exact request bytes to clear (base64)
    pub request: String,
    /// Target's signature over the request bytes (hex)
    pub signature: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let request = decode_base64("request", &req.request)?;
    let signature = decode_hex("signature", &req.signature)?;

    let verdict = state
        .registry()
        .withdraw_follow_request(&req.target, &request, &signature)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for WithdrawRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/follow/withdraw").unwrap();
        client.post(full_url).json(&self)
    }
}
