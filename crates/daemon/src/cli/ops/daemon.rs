use clap::Args;

use dirnode_daemon::state::{AppState, StateError};
use dirnode_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override log level (default from config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("invalid log level: {0}")]
    LogLevel(String),

    #[error("daemon failed: {0}")]
    Failed(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let log_level = self
            .log_level
            .as_deref()
            .unwrap_or(&state.config.log_level);
        let log_level: tracing::Level = log_level
            .parse()
            .map_err(|_| DaemonError::LogLevel(log_level.to_string()))?;

        let config = ServiceConfig {
            registry: state.config.registry_config(),
            api_port: self.api_port.unwrap_or(state.config.api_port),
            log_level,
            log_dir: self.log_dir.clone().or(state.config.log_dir),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
