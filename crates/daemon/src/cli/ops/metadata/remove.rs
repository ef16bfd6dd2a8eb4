use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;

use dirnode_daemon::http_server::api::v0::metadata::RemoveRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::MetadataError;
use crate::cli::op::signature_hex;

/// Delete a blob; its fragments are released to the fragment store
#[derive(Args, Debug, Clone)]
pub struct Remove {
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub lookup_key: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Remove {
    type Error = MetadataError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = ctx.signing_key()?;
        let request = RemoveRequest {
            owner: self.owner.clone(),
            sharing_key: key.public().to_hex(),
            lookup_key: STANDARD.encode(&self.lookup_key),
            signature: signature_hex(key.sign(self.lookup_key.as_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
