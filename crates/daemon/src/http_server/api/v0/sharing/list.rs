use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Owner whose sharing keys to list
    #[arg(long)]
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub owner: String,
    /// Confirmed sharing keys (hex), absent if the owner is unknown
    pub sharing_keys: Option<Vec<String>>,
}

impl std::fmt::Display for ListResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sharing_keys {
            None => write!(f, "{} is not registered", self.owner),
            Some(keys) if keys.is_empty() => write!(f, "{} has no sharing keys", self.owner),
            Some(keys) => write!(f, "{}", keys.join("\n")),
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ListRequest>,
) -> impl IntoResponse {
    let sharing_keys = state
        .registry()
        .list_sharing_keys(&req.owner)
        .map(|keys| keys.iter().map(|key| key.to_hex()).collect());
    Json(ListResponse {
        owner: req.owner,
        sharing_keys,
    })
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/sharing/list").unwrap();
        client.post(full_url).json(&self)
    }
}
