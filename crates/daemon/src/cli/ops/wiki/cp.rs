use clap::Args;

use quire_daemon::http_server::api::v0::wiki::{TransferBody, TransferResponse};

use super::WikiOpError;

#[derive(Args, Debug, Clone)]
pub struct Cp {
    pub source: String,
    pub destination: String,

    /// Copy a whole directory
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

/// Body for copy and move; `-r` forces directory mode, otherwise the server
/// infers it from the source path.
pub(super) fn transfer_body(source: &str, destination: &str, recursive: bool) -> TransferBody {
    TransferBody {
        source_path: source.to_string(),
        destination_path: destination.to_string(),
        is_directory: recursive.then_some(true),
    }
}

pub(super) fn summarize(verb: &str, response: TransferResponse) -> Result<String, WikiOpError> {
    if response.success {
        return Ok(format!(
            "{} {} -> {} ({} keys)",
            verb, response.source_path, response.destination_path, response.succeeded
        ));
    }
    let failed = response
        .failures
        .iter()
        .map(|f| format!("  {}: {}", f.key, f.message))
        .collect::<Vec<_>>()
        .join("\n");
    Err(WikiOpError::Incomplete(format!(
        "{} {} of {} keys from {}; failed:\n{}",
        verb, response.succeeded, response.total_keys, response.source_path, failed
    )))
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Cp {
    type Error = WikiOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let response = client
            .call(transfer_body(&self.source, &self.destination, self.recursive))
            .await?;
        summarize("copied", response)
    }
}
