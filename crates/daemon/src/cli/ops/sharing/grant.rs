use clap::Args;

use common::prelude::PublicKey;
use dirnode_daemon::http_server::api::v0::sharing::GrantRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::SharingError;
use crate::cli::op::signature_hex;

/// Authorize a key to write under your username
#[derive(Args, Debug, Clone)]
pub struct Grant {
    /// Your username
    #[arg(long)]
    pub username: String,

    /// Key to authorize (hex)
    #[arg(long)]
    pub sharing_key: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Grant {
    type Error = SharingError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let sharing_key = PublicKey::from_hex(&self.sharing_key)?;
        let key = ctx.signing_key()?;
        let request = GrantRequest {
            username: self.username.clone(),
            sharing_key: sharing_key.to_hex(),
            signature: signature_hex(key.sign(&sharing_key.to_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
