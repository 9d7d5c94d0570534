use quire_daemon::http_server::api::v0::wiki::GetFileRequest;

use super::WikiOpError;

#[async_trait::async_trait]
impl crate::cli::op::Op for GetFileRequest {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let response = client.call(self.clone()).await?;
        Ok(response.content)
    }
}
