use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LookupRequest {
    /// Username to resolve
    #[arg(long)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub username: String,
    /// Bound public key (hex), if the username is claimed
    pub public_key: Option<String>,
}

impl std::fmt::Display for LookupResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.public_key {
            Some(key) => write!(f, "{} -> {}", self.username, key),
            None => write!(f, "{} is not registered", self.username),
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<LookupRequest>,
) -> impl IntoResponse {
    let public_key = state.registry().lookup_key(&req.username);
    Json(LookupResponse {
        username: req.username,
        public_key: public_key.map(|key| key.to_hex()),
    })
}

impl ApiRequest for LookupRequest {
    type Response = LookupResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/user/lookup").unwrap();
        client.post(full_url).json(&self)
    }
}
