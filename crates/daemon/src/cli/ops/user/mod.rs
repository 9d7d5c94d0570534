use clap::{Args, Subcommand};

pub mod create;
pub mod rotate;
pub mod whoami;

use crate::cli::op::{MissingToken, Op};
use quire_daemon::http_server::api::client::ApiError;
use quire_daemon::http_server::api::v0::auth::CreateUserRequest;

crate::command_enum! {
    (Create, CreateUserRequest),
    (Whoami, whoami::Whoami),
    (Rotate, rotate::Rotate),
}

pub type UserCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[async_trait::async_trait]
impl Op for User {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserOpError {
    #[error(transparent)]
    MissingToken(#[from] MissingToken),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
