use clap::Args;

use common::prelude::PublicKey;
use dirnode_daemon::http_server::api::v0::sharing::BanRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::SharingError;
use crate::cli::op::signature_hex;

/// Revoke a sharing key; everything it wrote is dropped
#[derive(Args, Debug, Clone)]
pub struct Ban {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub sharing_key: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ban {
    type Error = SharingError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let sharing_key = PublicKey::from_hex(&self.sharing_key)?;
        let key = ctx.signing_key()?;
        let request = BanRequest {
            username: self.username.clone(),
            sharing_key: sharing_key.to_hex(),
            signature: signature_hex(key.sign(&sharing_key.to_bytes())),
        };
        Ok(ctx.client.call(request).await?)
    }
}
