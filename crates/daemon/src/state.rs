use std::{fs, path::PathBuf};

use common::prelude::{RegistryConfig, SecretKey};
use common::registry::{DEFAULT_FRAGMENT_LENGTH, DEFAULT_MAX_PENDING_FOLLOW_REQUESTS};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "dirnode";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const KEY_FILE_NAME: &str = "key.pem";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Length in bytes of a single fragment in the fragment store
    #[serde(default = "default_fragment_length")]
    pub fragment_length: u64,
    /// Cap on outstanding follow requests per user
    #[serde(default = "default_max_pending_follow_requests")]
    pub max_pending_follow_requests: usize,
    /// Default log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_api_port() -> u16 {
    5001
}

fn default_fragment_length() -> u64 {
    DEFAULT_FRAGMENT_LENGTH
}

fn default_max_pending_follow_requests() -> usize {
    DEFAULT_MAX_PENDING_FOLLOW_REQUESTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            fragment_length: default_fragment_length(),
            max_pending_follow_requests: default_max_pending_follow_requests(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            fragment_length: self.fragment_length,
            max_pending_follow_requests: self.max_pending_follow_requests,
            ..RegistryConfig::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the dirnode directory (~/.dirnode)
    pub dirnode_dir: PathBuf,
    /// Path to the signing key PEM file
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the dirnode directory path (custom or default ~/.dirnode)
    pub fn dirnode_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new dirnode state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let dirnode_dir = Self::dirnode_dir(custom_path)?;

        if dirnode_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&dirnode_dir)?;

        // Generate and save the signing key
        let key = SecretKey::generate();
        let key_path = dirnode_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, key.to_pem())?;

        let config = config.unwrap_or_default();
        let config_path = dirnode_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            dirnode_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the dirnode directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dirnode_dir = Self::dirnode_dir(custom_path)?;

        if !dirnode_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let key_path = dirnode_dir.join(KEY_FILE_NAME);
        let config_path = dirnode_dir.join(CONFIG_FILE_NAME);

        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            dirnode_dir,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the secret key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let key = SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("dirnode directory not initialized. Run 'dirnode init' first")]
    NotInitialized,

    #[error("dirnode directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
