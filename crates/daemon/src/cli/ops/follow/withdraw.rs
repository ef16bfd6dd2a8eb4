use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;

use dirnode_daemon::http_server::api::v0::follow::WithdrawRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::FollowError;
use crate::cli::op::signature_hex;

/// Clear a request from your own mailbox without granting it
#[derive(Args, Debug, Clone)]
pub struct Withdraw {
    /// Your username
    #[arg(long)]
    pub username: String,

    /// The request to clear, as listed by `follow pending` (base64)
    #[arg(long)]
    pub request: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Withdraw {
    type Error = FollowError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = ctx.signing_key()?;
        let bytes = STANDARD.decode(&self.request)?;
        let request = WithdrawRequest {
            target: self.username.clone(),
            request: self.request.clone(),
            signature: signature_hex(key.sign(&bytes)),
        };
        Ok(ctx.client.call(request).await?)
    }
}
