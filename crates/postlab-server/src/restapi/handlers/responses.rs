//! Response handlers

use super::{fail, json_body, ok, path_id, ApiResult};
use crate::{middleware::RequestId, AppState};
use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path, State,
};
use postlab_core::{NewResponse, ResponseRecord, ResponseUpdate};
use serde_json::{json, Value};

/// POST /responses
pub async fn save_response(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<NewResponse>, JsonRejection>,
) -> ApiResult<ResponseRecord> {
    let response = json_body(payload, &request_id)?;
    let saved =
        app_state.orchestrator.save_response(response).await.map_err(|e| fail(e, &request_id))?;
    ok(saved, &request_id)
}

/// GET /responses/:id
pub async fn get_response(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<ResponseRecord> {
    let id = path_id(id, &request_id)?;
    let response =
        app_state.orchestrator.get_response(id).await.map_err(|e| fail(e, &request_id))?;
    ok(response, &request_id)
}

/// PUT /responses/:id
pub async fn update_response(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ResponseUpdate>, JsonRejection>,
) -> ApiResult<ResponseRecord> {
    let id = path_id(id, &request_id)?;
    let update = json_body(payload, &request_id)?;
    let response = app_state
        .orchestrator
        .update_response(id, update)
        .await
        .map_err(|e| fail(e, &request_id))?;
    ok(response, &request_id)
}

/// DELETE /responses/:id
pub async fn delete_response(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let id = path_id(id, &request_id)?;
    app_state.orchestrator.delete_response(id).await.map_err(|e| fail(e, &request_id))?;
    ok(json!({"id": id}), &request_id)
}
