//! REST API handlers

pub mod collections;
pub mod health;
pub mod params;
pub mod requests;
pub mod responses;

use crate::{
    dto::ResponseEnvelope,
    error::{ErrorResponse, ServerError},
    middleware::RequestId,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query,
    },
    http::StatusCode,
};

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<ResponseEnvelope<T>>, ApiError>;

pub(crate) fn ok<T>(data: T, request_id: &RequestId) -> ApiResult<T> {
    Ok(Json(ResponseEnvelope::ok(data, request_id.0.clone())))
}

pub(crate) fn fail(err: impl Into<ServerError>, request_id: &RequestId) -> ApiError {
    err.into().to_http_response(request_id.0.clone())
}

/// Unwrap a JSON body, reporting malformed payloads in the error envelope
pub(crate) fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    request_id: &RequestId,
) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| fail(ServerError::InvalidInput(e.body_text()), request_id))
}

pub(crate) fn path_id(
    path: Result<Path<i64>, PathRejection>,
    request_id: &RequestId,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| fail(ServerError::InvalidInput(e.body_text()), request_id))
}

pub(crate) fn query<T>(
    query: Result<Query<T>, QueryRejection>,
    request_id: &RequestId,
) -> Result<T, ApiError> {
    query
        .map(|Query(value)| value)
        .map_err(|e| fail(ServerError::InvalidInput(e.body_text()), request_id))
}
