use std::path::PathBuf;

use clap::{Args, ValueEnum};

use object_store::ObjectStoreConfig;
use quire_daemon::state::{AppConfig, AppState, StateError};
use quire_daemon::{spawn_service, ServiceConfig};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Local,
    S3,
}

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the storage backend from config.toml
    #[arg(long, value_enum)]
    pub store: Option<StoreKind>,

    /// Directory for --store local (defaults to <config dir>/objects)
    #[arg(long)]
    pub local_path: Option<PathBuf>,

    /// S3 endpoint URL (e.g. http://localhost:9000 for MinIO)
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    /// S3 bucket name
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// S3 region
    #[arg(long)]
    pub s3_region: Option<String>,

    #[arg(long, env = "QUIRE_S3_ACCESS_KEY", hide_env_values = true)]
    pub s3_access_key: Option<String>,

    #[arg(long, env = "QUIRE_S3_SECRET_KEY", hide_env_values = true)]
    pub s3_secret_key: Option<String>,

    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Log level for stdout and file output; RUST_LOG takes precedence
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Open POST /api/v0/auth/users to anyone
    #[arg(long)]
    pub allow_registration: bool,

    /// Seed the demo principals and print their tokens
    #[arg(long)]
    pub seed_demo: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("--store s3 requires {0}")]
    MissingS3Setting(&'static str),
}

impl Daemon {
    fn store_config(
        &self,
        configured: &ObjectStoreConfig,
        quire_dir: &std::path::Path,
    ) -> Result<ObjectStoreConfig, DaemonError> {
        let Some(kind) = self.store else {
            return Ok(configured.clone());
        };

        Ok(match kind {
            StoreKind::Memory => ObjectStoreConfig::Memory,
            StoreKind::Local => ObjectStoreConfig::Local {
                path: self
                    .local_path
                    .clone()
                    .unwrap_or_else(|| quire_dir.join(quire_daemon::state::OBJECTS_DIR_NAME)),
            },
            StoreKind::S3 => ObjectStoreConfig::S3 {
                endpoint: required(&self.s3_endpoint, "--s3-endpoint")?,
                bucket: required(&self.s3_bucket, "--s3-bucket")?,
                access_key: required(&self.s3_access_key, "QUIRE_S3_ACCESS_KEY")?,
                secret_key: required(&self.s3_secret_key, "QUIRE_S3_SECRET_KEY")?,
                region: self.s3_region.clone(),
            },
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, DaemonError> {
    value.clone().ok_or(DaemonError::MissingS3Setting(name))
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Running without `quire init` is allowed; flags then stand alone
        let (quire_dir, app_config) = match AppState::load(ctx.config_path.clone()) {
            Ok(state) => (state.quire_dir, state.config),
            Err(StateError::NotInitialized) => (
                AppState::quire_dir(ctx.config_path.clone())?,
                AppConfig::default(),
            ),
            Err(e) => return Err(e.into()),
        };

        let config = ServiceConfig {
            store: self.store_config(&app_config.store, &quire_dir)?,
            api_port: self.api_port.unwrap_or(app_config.api_port),
            allow_registration: self.allow_registration || app_config.allow_registration,
            seed_demo_principals: self.seed_demo || app_config.seed_demo_principals,
            log_level: self.log_level,
            log_dir: self.log_dir.clone().or(app_config.log_dir),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
