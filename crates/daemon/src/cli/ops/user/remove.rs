use clap::Args;

use dirnode_daemon::http_server::api::v0::user::RemoveRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::UserError;
use crate::cli::op::signature_hex;

/// Give up a username held by the local key, dropping everything stored
/// under it
#[derive(Args, Debug, Clone)]
pub struct Remove {
    #[arg(long)]
    pub username: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Remove {
    type Error = UserError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = ctx.signing_key()?;
        let request = RemoveRequest {
            username: self.username.clone(),
            public_key: key.public().to_hex(),
            signature: signature_hex(key.sign_digest(self.username.as_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
