use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use quire_daemon::http_server::api::v0::wiki::PutFileRequest;

use super::WikiOpError;

#[derive(Args, Debug, Clone)]
pub struct Put {
    /// Full key of the page, e.g. users/alice/notes.md
    pub path: String,

    /// Page content (or use --file, or pipe it on stdin)
    #[arg(long, group = "source")]
    pub content: Option<String>,

    /// Read the page content from a local file
    #[arg(long, group = "source")]
    pub file: Option<PathBuf>,
}

impl Put {
    fn read_content(&self) -> Result<String, WikiOpError> {
        if let Some(content) = &self.content {
            return Ok(content.clone());
        }
        if let Some(file) = &self.file {
            return Ok(std::fs::read_to_string(file)?);
        }
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Put {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let content = self.read_content()?;
        let size = content.len();

        let response = client
            .call(PutFileRequest {
                path: self.path.clone(),
                content,
            })
            .await?;
        Ok(format!("wrote {} ({} bytes)", response.path, size))
    }
}
