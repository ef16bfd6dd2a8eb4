use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{decode_hex, RequestError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct WhoisRequest {
    /// Public key to resolve (hex)
    #[arg(long)]
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoisResponse {
    pub public_key: String,
    pub username: Option<String>,
}

impl std::fmt::Display for WhoisResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.username {
            Some(username) => write!(f, "{} -> {}", self.public_key, username),
            None => write!(f, "{} holds no username", self.public_key),
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<WhoisRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let public_key = decode_hex("public_key", &req.public_key)?;
    let username = state.registry().lookup_username(&public_key)?;
    Ok(Json(WhoisResponse {
        public_key: req.public_key,
        username,
    }))
}

impl ApiRequest for WhoisRequest {
    type Response = WhoisResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/user/whois").unwrap();
        client.post(full_url).json(&self)
    }
}
