//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] postlab_config::ConfigError),

    #[error("{0}")]
    Core(#[from] postlab_core::CoreError),

    #[error("Server error: {0}")]
    Server(#[from] postlab_server::ServerError),

    #[error("General error: {0}")]
    General(String),
}

impl From<postlab_store::StoreError> for CliError {
    fn from(err: postlab_store::StoreError) -> Self {
        Self::Core(err.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
