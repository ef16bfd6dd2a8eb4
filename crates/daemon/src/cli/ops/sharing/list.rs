use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::sharing::list::{ListRequest, ListResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for ListRequest {
    type Error = ApiError;
    type Output = ListResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
