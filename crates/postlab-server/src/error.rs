//! Server error types

use crate::dto::ResponseMeta;
use axum::{http::StatusCode, response::Json};
use postlab_core::CoreError;
use serde::Serialize;

pub type ServerResult<T> = Result<T, ServerError>;

/// Message returned for every internal failure; the cause only goes to the log.
pub const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("Rate limited")]
    RateLimit,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ServerError::InvalidInput(e.to_string()),
            CoreError::Invalid(msg) => ServerError::InvalidInput(msg),
            CoreError::NotFound(msg) => ServerError::NotFound(msg),
            CoreError::Dispatch(msg) => ServerError::Dispatch(msg),
            CoreError::RateLimited => ServerError::RateLimit,
            CoreError::Conflict(msg) => ServerError::Conflict(msg),
            other @ (CoreError::Serde(_) | CoreError::Db(_) | CoreError::Other(_)) => {
                ServerError::Internal(other.to_string())
            }
        }
    }
}

/// Error response DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub metadata: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Dispatch(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn to_http_response(&self, request_id: String) -> (StatusCode, Json<ErrorResponse>) {
        let (code, message) = match self {
            ServerError::InvalidInput(msg) => ("INVALID_INPUT", msg.clone()),
            ServerError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            ServerError::Dispatch(msg) => ("DISPATCH_FAILED", msg.clone()),
            ServerError::RateLimit => {
                ("RATE_LIMITED", "Remote endpoint rate limited the request".to_string())
            }
            ServerError::Conflict(msg) => ("CONFLICT", msg.clone()),
            ServerError::Internal(cause) => {
                tracing::error!(request_id = %request_id, error = %cause, "internal error");
                ("INTERNAL", INTERNAL_MESSAGE.to_string())
            }
        };

        let response = ErrorResponse {
            success: false,
            error: ErrorDetails { code: code.to_string(), message },
            metadata: ResponseMeta::new(request_id),
        };

        (self.status_code(), Json(response))
    }
}
