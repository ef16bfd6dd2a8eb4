use std::net::SocketAddr;

use clap::Args;

use common::prelude::{commit_message, Hash};
use dirnode_daemon::http_server::api::v0::storage::CommitRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::StorageError;
use crate::cli::op::signature_hex;

/// Record that a storage node holds a fragment written by the local key
#[derive(Args, Debug, Clone)]
pub struct Commit {
    /// Username the node is pledged by
    #[arg(long)]
    pub donor: String,

    #[arg(long)]
    pub address: SocketAddr,

    /// Owner the fragment was written for
    #[arg(long)]
    pub owner: String,

    /// Fragment hash (hex)
    #[arg(long)]
    pub hash: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Commit {
    type Error = StorageError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let hash = Hash::from_hex(&self.hash)?;
        let key = ctx.signing_key()?;
        let request = CommitRequest {
            donor: self.donor.clone(),
            address: self.address,
            owner: self.owner.clone(),
            sharing_key: key.public().to_hex(),
            hash: hash.to_hex(),
            signature: signature_hex(key.sign(&commit_message(&key.public(), &hash))),
        };
        Ok(ctx.client.call(request).await?)
    }
}
