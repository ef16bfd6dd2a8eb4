use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::user::whois::{WhoisRequest, WhoisResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for WhoisRequest {
    type Error = ApiError;
    type Output = WhoisResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
