use quire_daemon::http_server::api::v0::auth::CreateUserRequest;

use super::UserOpError;

/// Registration needs no token; the reply carries the new principal's.
#[async_trait::async_trait]
impl crate::cli::op::Op for CreateUserRequest {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response = ctx.client.call(self.clone()).await?;
        let user = response.user;

        Ok(format!(
            "created principal {}\n  root:  users/{}/\n  token: {}\n\n\
             export QUIRE_TOKEN={}",
            user.id,
            user.id,
            user.secret_key.as_deref().unwrap_or("<not returned>"),
            user.secret_key.as_deref().unwrap_or_default(),
        ))
    }
}
