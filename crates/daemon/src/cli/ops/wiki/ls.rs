use quire_daemon::http_server::api::v0::wiki::ListFilesRequest;

use super::WikiOpError;

#[async_trait::async_trait]
impl crate::cli::op::Op for ListFilesRequest {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let response = client.call(self.clone()).await?;

        if response.files.is_empty() {
            return Ok(format!("{} is empty", response.path));
        }

        let output = response
            .files
            .iter()
            .map(|entry| {
                if entry.is_file {
                    format!(
                        "{:>10}  {}",
                        entry.size.map(|s| s.to_string()).unwrap_or_default(),
                        entry.name
                    )
                } else {
                    format!("{:>10}  {}/", "dir", entry.name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(output)
    }
}
