//! Request handlers: save-and-send, read and cascading delete

use super::{fail, json_body, ok, path_id, ApiResult};
use crate::{dto::DeletedView, middleware::RequestId, AppState};
use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path, State,
};
use postlab_core::RequestRecord;
use postlab_runtime::{SaveOutcome, SaveRequest};

/// POST /requests
pub async fn save_and_send(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<SaveOutcome> {
    let definition = json_body(payload, &request_id)?;
    tracing::debug!(
        request_id = %request_id.as_str(),
        method = %definition.method,
        url = %definition.url,
        "save and send"
    );

    let outcome =
        app_state.orchestrator.save_and_send(definition).await.map_err(|e| fail(e, &request_id))?;
    ok(outcome, &request_id)
}

/// GET /requests/:id
pub async fn get_request(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<RequestRecord> {
    let id = path_id(id, &request_id)?;
    let record = app_state.orchestrator.get_request(id).await.map_err(|e| fail(e, &request_id))?;
    ok(record, &request_id)
}

/// DELETE /requests/:id
pub async fn delete_request(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeletedView> {
    let id = path_id(id, &request_id)?;
    let deleted =
        app_state.orchestrator.delete_request(id).await.map_err(|e| fail(e, &request_id))?;
    ok(DeletedView { id, deleted }, &request_id)
}
