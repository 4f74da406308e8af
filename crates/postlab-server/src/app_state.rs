//! Application state shared by every handler

use postlab_config::PostlabConfig;
use postlab_core::CoreResult;
use postlab_dispatch::{HttpDispatcher, TimeoutConfig};
use postlab_runtime::Orchestrator;
use postlab_store::SqlStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator: Arc::new(orchestrator) }
    }

    /// Open the store, run migrations and build the HTTP dispatcher.
    pub async fn from_config(config: &PostlabConfig) -> CoreResult<Self> {
        config.validate()?;

        let store =
            SqlStore::new_with_config(&config.database.url, Some(config.database.max_connections))
                .await?;
        let timeouts = TimeoutConfig::new(
            config.dispatch.connect_timeout_ms,
            config.dispatch.request_timeout_ms,
        );
        let dispatcher = HttpDispatcher::with_user_agent(timeouts, &config.dispatch.user_agent)?;

        Ok(Self::new(Orchestrator::new(store, Arc::new(dispatcher))))
    }

    /// Release pooled connections; call once the server has stopped.
    pub async fn shutdown(&self) {
        self.orchestrator.store().close().await;
        tracing::info!("store closed");
    }
}
