use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct QuotaRequest {
    #[arg(long)]
    pub username: String,
}

/// Byte accounting for one user. `quota` and `usage` are `-1` for unknown
/// users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaResponse {
    pub username: String,
    pub quota: i64,
    pub usage: i64,
    pub remaining_capacity: i64,
}

impl std::fmt::Display for QuotaResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.quota < 0 {
            return write!(f, "{} is not registered", self.username);
        }
        write!(
            f,
            "{}: quota {} bytes, usage {} bytes, {} bytes remaining",
            self.username, self.quota, self.usage, self.remaining_capacity
        )
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<QuotaRequest>,
) -> impl IntoResponse {
    let registry = state.registry();
    Json(QuotaResponse {
        quota: registry.quota(&req.username),
        usage: registry.usage(&req.username),
        remaining_capacity: registry.remaining_capacity(&req.username),
        username: req.username,
    })
}

impl ApiRequest for QuotaRequest {
    type Response = QuotaResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/storage/quota").unwrap();
        client.post(full_url).json(&self)
    }
}
