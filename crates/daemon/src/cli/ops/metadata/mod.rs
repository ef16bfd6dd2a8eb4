use clap::{Args, Subcommand};

pub mod add;
pub mod allowed;
pub mod attach;
pub mod get;
pub mod remove;

use crate::cli::op::Op;
use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::metadata::{AllowedRequest, GetRequest};
use dirnode_daemon::state::StateError;

crate::command_enum! {
    (Add, add::Add),
    (Attach, attach::Attach),
    (Remove, remove::Remove),
    (Get, GetRequest),
    (Allowed, AllowedRequest),
}

pub type MetadataCommand = Command;

/// Write and inspect metadata blobs as a sharing key.
///
/// Write commands take the lookup key and payload as text; `get` and
/// `allowed` take the lookup key base64-encoded, as the API does.
#[derive(Args, Debug, Clone)]
pub struct Metadata {
    #[command(subcommand)]
    pub command: MetadataCommand,
}

#[async_trait::async_trait]
impl Op for Metadata {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("signing key unavailable: {0}")]
    Key(#[from] StateError),
    #[error("invalid fragment hash: {0}")]
    Hash(#[from] common::crypto::HashError),
}
