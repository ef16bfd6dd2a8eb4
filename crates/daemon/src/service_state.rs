use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::prelude::Registry;
use common::registry::ReleaseReceiver;

use super::service_config::Config;

/// Main service state, shared by every request handler
#[derive(Debug, Clone)]
pub struct State {
    registry: Registry,
    shutting_down: Arc<AtomicBool>,
}

impl State {
    /// Build the registry described by `config`.
    ///
    /// The returned receiver carries fragment releases and must be drained,
    /// see [`crate::process::releases`].
    pub fn from_config(config: &Config) -> (Self, ReleaseReceiver) {
        let (registry, releases) = Registry::with_releases(config.registry.clone());
        let state = Self {
            registry,
            shutting_down: Arc::new(AtomicBool::new(false)),
        };
        (state, releases)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Readiness fails from here on; liveness is unaffected
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> Result<(), ReadinessError> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(ReadinessError::ShuttingDown);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadinessError {
    #[error("service is shutting down")]
    ShuttingDown,
}
