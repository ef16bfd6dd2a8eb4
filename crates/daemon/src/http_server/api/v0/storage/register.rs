use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{RequestError, VerdictResponse};
use crate::ServiceState;

/// Pledge a storage node's capacity to one or more users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub donor: String,
    pub address: SocketAddr,
    /// beneficiary -> share of the node, summing to one
    pub fractions: BTreeMap<String, f64>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let verdict = state
        .registry()
        .register_storage_node(&req.donor, req.address, &req.fractions)?;
    Ok(Json(VerdictResponse::from(verdict)))
}

impl ApiRequest for RegisterRequest {
    type Response = VerdictResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/storage/register").unwrap();
        client.post(full_url).json(&self)
    }
}
