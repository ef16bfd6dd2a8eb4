use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::user::lookup::{LookupRequest, LookupResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for LookupRequest {
    type Error = ApiError;
    type Output = LookupResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
