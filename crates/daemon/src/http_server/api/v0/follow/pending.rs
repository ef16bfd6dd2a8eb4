use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::encode_base64;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct PendingRequest {
    /// Whose mailbox to read
    #[arg(long)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingResponse {
    pub username: String,
    /// Mailbox entries (base64), absent if the user is unknown
    pub requests: Option<Vec<String>>,
}

impl std::fmt::Display for PendingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(requests) = &self.requests else {
            return write!(f, "{} is not registered", self.username);
        };
        if requests.is_empty() {
            return write!(f, "no pending follow requests for {}", self.username);
        }
        for (i, request) in requests.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", request)?;
        }
        Ok(())
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<PendingRequest>,
) -> impl IntoResponse {
    let requests = state
        .registry()
        .pending_follow_requests(&req.username)
        .map(|requests| requests.iter().map(encode_base64).collect());
    Json(PendingResponse {
        username: req.username,
        requests,
    })
}

impl ApiRequest for PendingRequest {
    type Response = PendingResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/follow/pending").unwrap();
        client.post(full_url).json(&self)
    }
}
