use crate::types::Entity;
use crate::validation::ValidationError;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("dispatch failed: {0}")]
    Dispatch(String),
    #[error("rate limited by remote endpoint")]
    RateLimited,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid: {0}")]
    Invalid(String),
    #[error("serde: {0}")]
    Serde(String),
    #[error("db: {0}")]
    Db(String),
    #[error("other: {0}")]
    Other(String),
}

impl CoreError {
    /// `NotFound` for a single entity looked up by id.
    pub fn not_found(entity: Entity, id: i64) -> Self {
        CoreError::NotFound(format!("{} {} not found", entity, id))
    }

    /// True for failures the caller caused (bad input or unknown ids).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::NotFound(_)
                | CoreError::Invalid(_)
                | CoreError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
