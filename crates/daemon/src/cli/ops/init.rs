use clap::{Args, ValueEnum};

use object_store::ObjectStoreConfig;
use quire_daemon::state::{AppConfig, AppState, OBJECTS_DIR_NAME};

/// Backends `init` can write without further credentials.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStore {
    Memory,
    Local,
}

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Storage backend recorded in config.toml
    #[arg(long, value_enum, default_value_t = InitStore::Local)]
    pub store: InitStore,

    /// Let anyone register a principal over the API
    #[arg(long)]
    pub allow_registration: bool,

    /// Seed the demo principals when the daemon starts
    #[arg(long)]
    pub seed_demo: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] quire_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let quire_dir = AppState::quire_dir(ctx.config_path.clone())?;
        let store = match self.store {
            InitStore::Memory => ObjectStoreConfig::Memory,
            InitStore::Local => ObjectStoreConfig::Local {
                path: quire_dir.join(OBJECTS_DIR_NAME),
            },
        };

        let config = AppConfig {
            api_port: self.api_port,
            allow_registration: self.allow_registration,
            seed_demo_principals: self.seed_demo,
            log_dir: None,
            store,
        };

        let state = AppState::init(Some(quire_dir), Some(config))?;

        let store_str = match &state.config.store {
            ObjectStoreConfig::Memory => "memory".to_string(),
            ObjectStoreConfig::Local { path } => format!("local ({})", path.display()),
            ObjectStoreConfig::S3 { bucket, .. } => format!("s3 ({})", bucket),
        };

        Ok(format!(
            "Initialized quire directory at: {}\n\
             - Config: {}\n\
             - Store: {}\n\
             - API port: {}\n\
             - Registration: {}\n\
             - Demo principals: {}",
            state.quire_dir.display(),
            state.config_path.display(),
            store_str,
            state.config.api_port,
            if state.config.allow_registration { "open" } else { "closed" },
            state.config.seed_demo_principals,
        ))
    }
}
