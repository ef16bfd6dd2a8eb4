use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::storage::node::{NodeRequest, NodeResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for NodeRequest {
    type Error = ApiError;
    type Output = NodeResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
