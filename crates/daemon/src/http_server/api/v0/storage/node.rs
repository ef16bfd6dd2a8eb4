use std::net::SocketAddr;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::StorageNodeInfo;

use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct NodeRequest {
    /// Address the node was registered under
    #[arg(long)]
    pub address: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResponse {
    pub node: Option<StorageNodeInfo>,
}

impl std::fmt::Display for NodeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(node) = &self.node else {
            return write!(f, "no storage node at that address");
        };
        writeln!(f, "{} (owner {})", node.address, node.owner)?;
        writeln!(
            f,
            "{} fragments, {} bytes",
            node.fragment_count, node.size_bytes
        )?;
        let shares: Vec<String> = node
            .fractions
            .iter()
            .map(|(user, fraction)| format!("{}={}", user, fraction))
            .collect();
        write!(f, "shares: {}", shares.join(", "))
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<NodeRequest>,
) -> impl IntoResponse {
    Json(NodeResponse {
        node: state.registry().storage_node(&req.address),
    })
}

impl ApiRequest for NodeRequest {
    type Response = NodeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/storage/node").unwrap();
        client.post(full_url).json(&self)
    }
}
