use clap::{Args, Subcommand};

pub mod cat;
pub mod cp;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod put;
pub mod rm;
pub mod stat;

use crate::cli::op::{MissingToken, Op};
use quire_daemon::http_server::api::client::ApiError;
use quire_daemon::http_server::api::v0::wiki::{
    CreateFolderRequest, GetFileRequest, ListFilesRequest, MetadataRequest,
};

crate::command_enum! {
    (Ls, ListFilesRequest),
    (Cat, GetFileRequest),
    (Put, put::Put),
    (Rm, rm::Rm),
    (Mv, mv::Mv),
    (Cp, cp::Cp),
    (Mkdir, CreateFolderRequest),
    (Stat, MetadataRequest),
}

pub type WikiCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Wiki {
    #[command(subcommand)]
    pub command: WikiCommand,
}

#[async_trait::async_trait]
impl Op for Wiki {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Failure shared by the wiki subcommands.
#[derive(Debug, thiserror::Error)]
pub enum WikiOpError {
    #[error(transparent)]
    MissingToken(#[from] MissingToken),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Incomplete(String),
}
