use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_base64, RequestError, VerdictResponse};
use crate::ServiceState;

/// Drop an opaque follow request into a user's mailbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowRequest {
    pub target: String,
    /// Opaque request bytes (base64)
    pub request: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<FollowRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let request = decode_base64("request", &req.request)?;
    let verdict = state.registry().request_follow(&req.target, &request)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for FollowRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/follow/request").unwrap();
        client.post(full_url).json(&self)
    }
}
