use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;

use dirnode_daemon::http_server::api::v0::follow::FollowRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::FollowError;

/// Ask to follow a user
#[derive(Args, Debug, Clone)]
pub struct Request {
    /// User whose mailbox receives the request
    #[arg(long)]
    pub target: String,

    /// Request bytes (base64); defaults to the local public key
    #[arg(long)]
    pub request: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Request {
    type Error = FollowError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = match &self.request {
            Some(request) => request.clone(),
            None => STANDARD.encode(ctx.signing_key()?.public().to_bytes()),
        };
        let request = FollowRequest {
            target: self.target.clone(),
            request,
        };
        Ok(ctx.client.call(request).await?)
    }
}
