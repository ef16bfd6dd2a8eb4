use clap::{Args, Subcommand};

pub mod commit;
pub mod node;
pub mod quota;
pub mod register;

use crate::cli::op::Op;
use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::storage::{NodeRequest, QuotaRequest};
use dirnode_daemon::state::StateError;

crate::command_enum! {
    (Register, register::Register),
    (Commit, commit::Commit),
    (Node, NodeRequest),
    (Quota, QuotaRequest),
}

pub type StorageCommand = Command;

/// Storage donations and quota
#[derive(Args, Debug, Clone)]
pub struct Storage {
    #[command(subcommand)]
    pub command: StorageCommand,
}

#[async_trait::async_trait]
impl Op for Storage {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("signing key unavailable: {0}")]
    Key(#[from] StateError),
    #[error("invalid fragment hash: {0}")]
    Hash(#[from] common::crypto::HashError),
    #[error("invalid share `{0}`, expected USER=FRACTION")]
    Share(String),
}
