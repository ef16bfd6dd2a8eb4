use dirnode_daemon::http_server::api::client::ApiError;
use dirnode_daemon::http_server::api::v0::metadata::get::{GetRequest, GetResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for GetRequest {
    type Error = ApiError;
    type Output = GetResponse;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await
    }
}
