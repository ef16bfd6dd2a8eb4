use clap::{Args, Subcommand};

pub mod ban;
pub mod grant;
pub mod list;

use crate::cli::op::Op;
use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::sharing::ListRequest;
use dirnode_daemon::state::StateError;

crate::command_enum! {
    (Grant, grant::Grant),
    (Ban, ban::Ban),
    (List, ListRequest),
}

pub type SharingCommand = Command;

/// Manage the keys allowed to write your metadata
#[derive(Args, Debug, Clone)]
pub struct Sharing {
    #[command(subcommand)]
    pub command: SharingCommand,
}

#[async_trait::async_trait]
impl Op for Sharing {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SharingError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("signing key unavailable: {0}")]
    Key(#[from] StateError),
    #[error("invalid sharing key: {0}")]
    SharingKey(#[from] common::crypto::KeyError),
}
