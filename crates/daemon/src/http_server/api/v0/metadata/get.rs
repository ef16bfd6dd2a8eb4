use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::MetadataBlob;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::wire::{
    decode_base64, decode_hex, encode_base64, RequestError,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    #[arg(long)]
    pub owner: String,
    /// Writing sharing key (hex)
    #[arg(long)]
    pub sharing_key: String,
    /// Lookup key (base64)
    #[arg(long)]
    pub lookup_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobView {
    /// base64
    pub payload: String,
    /// hex each; absent while the blob is still open
    pub fragment_hashes: Option<Vec<String>>,
}

impl From<MetadataBlob> for BlobView {
    fn from(blob: MetadataBlob) -> Self {
        Self {
            payload: encode_base64(blob.payload()),
            fragment_hashes: blob
                .fragment_hashes()
                .map(|hashes| hashes.iter().map(|hash| hash.to_hex()).collect()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub blob: Option<BlobView>,
}

impl std::fmt::Display for GetResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(blob) = &self.blob else {
            return write!(f, "no such blob");
        };
        writeln!(f, "payload: {}", blob.payload)?;
        match &blob.fragment_hashes {
            None => write!(f, "open (no fragment hashes attached)"),
            Some(hashes) => {
                write!(f, "fragments: {}", hashes.len())?;
                for hash in hashes {
                    write!(f, "\n  {}", hash)?;
                }
                Ok(())
            }
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<GetRequest>,
) -> Result<impl IntoResponse, RequestError> {
    let sharing_key = decode_hex("sharing_key", &req.sharing_key)?;
    let lookup_key = decode_base64("lookup_key", &req.lookup_key)?;

    let blob = state
        .registry()
        .get_metadata_blob(&req.owner, &sharing_key, &lookup_key)?;
    Ok(Json(GetResponse {
        blob: blob.map(BlobView::from),
    }))
}

impl ApiRequest for GetRequest {
    type Response = GetResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/metadata/get").unwrap();
        client.post(full_url).json(&self)
    }
}
