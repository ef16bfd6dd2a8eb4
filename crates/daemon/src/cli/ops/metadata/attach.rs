use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;

use common::prelude::{attach_message, Hash};
use dirnode_daemon::http_server::api::v0::metadata::AttachRequest;
use dirnode_daemon::http_server::api::v0::VerdictResponse;

use super::MetadataError;
use crate::cli::op::signature_hex;

/// Certify the fragments a blob refers to, replacing any earlier list
#[derive(Args, Debug, Clone)]
pub struct Attach {
    #[arg(long)]
    pub owner: String,

    #[arg(long)]
    pub lookup_key: String,

    /// Payload the blob was created with
    #[arg(long)]
    pub payload: String,

    /// Fragment hash (hex); repeat for each fragment, in order
    #[arg(long = "hash")]
    pub hashes: Vec<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Attach {
    type Error = MetadataError;
    type Output = VerdictResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let hashes = self
            .hashes
            .iter()
            .map(|hash| Hash::from_hex(hash))
            .collect::<Result<Vec<_>, _>>()?;
        let concatenated: Vec<u8> = hashes.iter().flat_map(|hash| *hash.as_bytes()).collect();

        let key = ctx.signing_key()?;
        let message = attach_message(
            self.lookup_key.as_bytes(),
            self.payload.as_bytes(),
            &concatenated,
        );
        let request = AttachRequest {
            owner: self.owner.clone(),
            sharing_key: key.public().to_hex(),
            lookup_key: STANDARD.encode(&self.lookup_key),
            payload: STANDARD.encode(&self.payload),
            fragment_hashes: hashes.iter().map(Hash::to_hex).collect(),
            signature: signature_hex(key.sign(&message)),
        };
        Ok(ctx.client.call(request).await?)
    }
}
