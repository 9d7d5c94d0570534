use std::path::PathBuf;

use object_store::ObjectStoreConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // storage configuration
    /// Object storage backend holding every principal's tree
    pub store: ObjectStoreConfig,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // identity configuration
    /// Whether `POST /api/v0/auth/users` is open
    pub allow_registration: bool,
    /// Seed the demo principals (and their welcome pages) at start-up
    pub seed_demo_principals: bool,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: ObjectStoreConfig::Memory,
            api_port: 5001,
            allow_registration: false,
            seed_demo_principals: false,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
