use clap::{Args, Subcommand};

pub mod claim;
pub mod lookup;
pub mod remove;
pub mod whois;

use crate::cli::op::Op;
use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::user::{LookupRequest, WhoisRequest};
use dirnode_daemon::state::StateError;

crate::command_enum! {
    (Claim, claim::Claim),
    (Remove, remove::Remove),
    (Lookup, LookupRequest),
    (Whois, WhoisRequest),
}

pub type UserCommand = Command;

/// Claim, release and resolve usernames
#[derive(Args, Debug, Clone)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[async_trait::async_trait]
impl Op for User {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("signing key unavailable: {0}")]
    Key(#[from] StateError),
}
