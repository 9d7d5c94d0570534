use std::{fs, path::PathBuf};

use object_store::ObjectStoreConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "quire";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const OBJECTS_DIR_NAME: &str = "objects";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Whether anyone may register a principal over the API
    #[serde(default)]
    pub allow_registration: bool,
    /// Seed the demo principals at start-up
    #[serde(default)]
    pub seed_demo_principals: bool,
    /// Directory for log files (stdout only if not set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    // tables go last in toml
    /// Object storage backend
    #[serde(default)]
    pub store: ObjectStoreConfig,
}

fn default_api_port() -> u16 {
    5001
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            allow_registration: false,
            seed_demo_principals: false,
            log_dir: None,
            store: ObjectStoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the quire directory (~/.quire)
    pub quire_dir: PathBuf,
    /// Path to the default local object directory
    pub objects_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the quire directory path (custom or default ~/.quire)
    pub fn quire_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new quire state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let quire_dir = Self::quire_dir(custom_path)?;

        if quire_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&quire_dir)?;

        let objects_path = quire_dir.join(OBJECTS_DIR_NAME);
        fs::create_dir_all(&objects_path)?;

        let config = config.unwrap_or_default();
        let config_path = quire_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            quire_dir,
            objects_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the quire directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let quire_dir = Self::quire_dir(custom_path)?;

        if !quire_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let objects_path = quire_dir.join(OBJECTS_DIR_NAME);
        let config_path = quire_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            quire_dir,
            objects_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("quire directory not initialized. Run 'quire init' first")]
    NotInitialized,

    #[error("quire directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
