use clap::Args;

use quire_daemon::http_server::api::v0::auth::VerifyRequest;

use super::UserOpError;

#[derive(Args, Debug, Clone)]
pub struct Whoami;

#[async_trait::async_trait]
impl crate::cli::op::Op for Whoami {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let client = ctx.authenticated_client()?;
        let user = client.call(VerifyRequest::default()).await?.user;

        let mut lines = vec![format!("id:      {}", user.id)];
        if let Some(email) = &user.email {
            lines.push(format!("email:   {}", email));
        }
        lines.push(format!("created: {}", user.created_at));
        lines.push(format!("root:    users/{}/", user.id));
        Ok(lines.join("\n"))
    }
}
