use clap::Args;

use quire_daemon::http_server::api::v0::wiki::MoveRequest;

use super::cp::{summarize, transfer_body};
use super::WikiOpError;

#[derive(Args, Debug, Clone)]
pub struct Mv {
    pub source: String,
    pub destination: String,

    /// Move a whole directory
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Mv {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let response = client
            .call(MoveRequest(transfer_body(
                &self.source,
                &self.destination,
                self.recursive,
            )))
            .await?;
        summarize("moved", response)
    }
}
