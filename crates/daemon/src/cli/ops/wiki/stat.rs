use common::wiki::Stat;
use quire_daemon::http_server::api::v0::wiki::MetadataRequest;

use super::WikiOpError;

#[async_trait::async_trait]
impl crate::cli::op::Op for MetadataRequest {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let response = client.call(self.clone()).await?;

        Ok(match response.stat {
            Stat::File {
                path,
                size,
                last_modified,
            } => format!(
                "{}\n  type:     file\n  size:     {} bytes\n  modified: {}",
                path, size, last_modified
            ),
            Stat::Directory {
                path,
                file_count,
                folder_count,
                total_size,
            } => format!(
                "{}\n  type:     directory\n  files:    {}\n  folders:  {}\n  size:     {} bytes",
                path, file_count, folder_count, total_size
            ),
        })
    }
}
