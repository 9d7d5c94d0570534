pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(about = "Per-user markdown wiki over an object store")]
#[command(version)]
pub struct Args {
    /// Daemon API URL (defaults to localhost on the configured api_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the quire config directory (defaults to ~/.quire)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Bearer token for authenticated commands
    #[arg(long, global = true, env = "QUIRE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
