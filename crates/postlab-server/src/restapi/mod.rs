//! REST API module

pub mod handlers;
pub mod router;

pub use router::create_router;

use crate::{AppState, ServerError, ServerResult};
use std::future::Future;
use std::net::SocketAddr;

/// Serve the REST API until `shutdown` resolves
pub async fn serve<F>(app_state: AppState, addr: &str, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(app_state);

    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| ServerError::InvalidInput(format!("Invalid address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

    tracing::info!(%addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("REST API stopped");
    Ok(())
}
