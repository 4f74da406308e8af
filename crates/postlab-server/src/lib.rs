//! Postlab Server
//!
//! REST API over the request orchestrator.

pub mod app_state;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod restapi;

// Re-export key types
pub use app_state::AppState;
pub use error::{ServerError, ServerResult};
pub use restapi::{create_router, serve};
