use postlab_core::CoreError;

/// Failures while building an outbound call, before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Body build failed: {0}")]
    Body(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<DispatchError> for CoreError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Client(e) => CoreError::Dispatch(e.to_string()),
            DispatchError::InvalidUrl(msg) => CoreError::Invalid(msg),
            DispatchError::Body(msg) => CoreError::Invalid(msg),
            DispatchError::InvalidConfig(msg) => CoreError::Other(msg),
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
