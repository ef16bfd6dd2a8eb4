use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;

use dirnode_daemon::http_server::api::v0::metadata::AddRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::MetadataError;
use crate::cli::op::signature_hex;

/// Create an open blob under an owner who granted the local key
#[derive(Args, Debug, Clone)]
pub struct Add {
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub lookup_key: String,

    #[arg(long)]
    pub payload: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Add {
    type Error = MetadataError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = ctx.signing_key()?;
        let request = AddRequest {
            owner: self.owner.clone(),
            sharing_key: key.public().to_hex(),
            lookup_key: STANDARD.encode(&self.lookup_key),
            payload: STANDARD.encode(&self.payload),
            signature: signature_hex(key.sign(self.payload.as_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
