use clap::Args;

use quire_daemon::http_server::api::v0::auth::{RegenerateKeyRequest, VerifyRequest};

use super::UserOpError;

#[derive(Args, Debug, Clone)]
pub struct Rotate;

#[async_trait::async_trait]
impl crate::cli::op::Op for Rotate {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let user_id = client.call(VerifyRequest::default()).await?.user.id;

        let response = client.call(RegenerateKeyRequest { user_id }).await?;
        Ok(format!(
            "rotated token for {}; the old token no longer works\n\n\
             export QUIRE_TOKEN={}",
            response.user_id, response.secret_key
        ))
    }
}
