use clap::{Args, Subcommand};

pub mod pending;
pub mod request;
pub mod withdraw;

use crate::cli::op::Op;
use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::follow::PendingRequest;
use dirnode_daemon::state::StateError;

crate::command_enum! {
    (Request, request::Request),
    (Withdraw, withdraw::Withdraw),
    (Pending, PendingRequest),
}

pub type FollowCommand = Command;

/// Follow-request mailboxes
#[derive(Args, Debug, Clone)]
pub struct Follow {
    #[command(subcommand)]
    pub command: FollowCommand,
}

#[async_trait::async_trait]
impl Op for Follow {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("signing key unavailable: {0}")]
    Key(#[from] StateError),
    #[error("request is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
