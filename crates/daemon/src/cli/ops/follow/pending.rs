use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::follow::pending::{PendingRequest, PendingResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for PendingRequest {
    type Error = ApiError;
    type Output = PendingResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
