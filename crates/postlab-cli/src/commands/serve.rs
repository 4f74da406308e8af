//! REST API server command

use crate::{error::CliResult, utils::ColoredOutput};
use postlab_config::PostlabConfig;
use postlab_server::AppState;

pub struct ServeCommand;

impl ServeCommand {
    /// Run until Ctrl-C, then close the store.
    pub async fn run(config: &PostlabConfig) -> CliResult<()> {
        tracing::info!(
            addr = %config.server.addr,
            database_url = %config.database.url,
            request_timeout_ms = config.dispatch.request_timeout_ms,
            "starting REST API server"
        );

        let app_state = AppState::from_config(config).await?;
        println!(
            "{} {}",
            ColoredOutput::success("Listening on"),
            ColoredOutput::highlight(&config.server.addr)
        );

        let served =
            postlab_server::serve(app_state.clone(), &config.server.addr, shutdown_signal()).await;
        app_state.shutdown().await;
        served?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            // Without a signal handler the server runs until killed
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}
