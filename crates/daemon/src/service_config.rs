use std::path::PathBuf;

use common::prelude::RegistryConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // registry configuration
    /// Fragment length, follow-request cap and fraction tolerance
    pub registry: RegistryConfig,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            api_port: 5001,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
