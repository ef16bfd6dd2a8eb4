use clap::Args;

use dirnode_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Fragment length in bytes; must match the fragment store
    #[arg(long)]
    pub fragment_length: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_port: self.api_port,
            fragment_length: self.fragment_length.unwrap_or(defaults.fragment_length),
            ..defaults
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let key = state.load_key()?;

        let output = format!(
            "Initialized dirnode directory at: {}\n\
             - Key: {}\n\
             - Public key: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Fragment length: {} bytes",
            state.dirnode_dir.display(),
            state.key_path.display(),
            key.public().to_hex(),
            state.config_path.display(),
            state.config.api_port,
            state.config.fragment_length,
        );

        Ok(output)
    }
}
