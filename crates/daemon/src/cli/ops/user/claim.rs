use clap::Args;

use dirnode_daemon::http_server::api::v0::user::ClaimRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::UserError;
use crate::cli::op::signature_hex;

/// Bind a username to the local key
#[derive(Args, Debug, Clone)]
pub struct Claim {
    #[arg(long)]
    pub username: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Claim {
    type Error = UserError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = ctx.signing_key()?;
        let request = ClaimRequest {
            username: self.username.clone(),
            public_key: key.public().to_hex(),
            signature: signature_hex(key.sign(self.username.as_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
