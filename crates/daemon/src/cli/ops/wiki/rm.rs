use clap::Args;

use quire_daemon::http_server::api::v0::wiki::{DeleteDirectoryRequest, DeleteFileRequest};

use super::WikiOpError;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Page or directory to delete
    pub path: String,

    /// Delete a directory and everything beneath it
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;

        if !self.recursive {
            let response = client
                .call(DeleteFileRequest {
                    path: self.path.clone(),
                })
                .await?;
            return Ok(format!("deleted {}", response.path));
        }

        let response = client
            .call(DeleteDirectoryRequest {
                path: self.path.clone(),
            })
            .await?;

        if response.success {
            Ok(format!(
                "deleted {} ({} keys)",
                response.path, response.deleted_count
            ))
        } else {
            let failed = response
                .failures
                .iter()
                .map(|f| format!("  {}: {}", f.key, f.message))
                .collect::<Vec<_>>()
                .join("\n");
            Err(WikiOpError::Incomplete(format!(
                "deleted {} of {} keys under {}; failed:\n{}",
                response.deleted_count, response.total_keys, response.path, failed
            )))
        }
    }
}
