//! Collection handlers

use super::{fail, json_body, ok, path_id, ApiResult};
use crate::{
    dto::{CollectionView, CreateCollectionRequest, DeletedView, RenameCollectionRequest},
    error::ServerError,
    middleware::RequestId,
    AppState,
};
use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Extension, Json, Path, State,
};
use postlab_core::RequestRecord;
use serde_json::{json, Value};

/// POST /collections
pub async fn create_collection(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<CreateCollectionRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let payload = json_body(payload, &request_id)?;
    if payload.name.trim().is_empty() {
        return Err(fail(
            ServerError::InvalidInput("Collection name must not be empty".to_string()),
            &request_id,
        ));
    }

    let collection = app_state
        .orchestrator
        .create_collection(&payload.name)
        .await
        .map_err(|e| fail(e, &request_id))?;

    ok(json!({"collection_id": collection.id}), &request_id)
}

/// GET /collections
pub async fn list_collections(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<CollectionView>> {
    let collections =
        app_state.orchestrator.list_collections().await.map_err(|e| fail(e, &request_id))?;
    ok(collections.into_iter().map(CollectionView::from).collect(), &request_id)
}

/// GET /collections/:id
pub async fn get_collection(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<CollectionView> {
    let id = path_id(id, &request_id)?;
    let collection =
        app_state.orchestrator.get_collection(id).await.map_err(|e| fail(e, &request_id))?;
    ok(collection.into(), &request_id)
}

/// GET /collections/:id/requests
pub async fn list_collection_requests(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<RequestRecord>> {
    let id = path_id(id, &request_id)?;
    let requests = app_state
        .orchestrator
        .list_collection_requests(id)
        .await
        .map_err(|e| fail(e, &request_id))?;
    ok(requests, &request_id)
}

/// PATCH /collections/:id
pub async fn rename_collection(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RenameCollectionRequest>, JsonRejection>,
) -> ApiResult<CollectionView> {
    let id = path_id(id, &request_id)?;
    let payload = json_body(payload, &request_id)?;
    let collection = app_state
        .orchestrator
        .update_collection_name(id, payload.new_name)
        .await
        .map_err(|e| fail(e, &request_id))?;
    ok(collection.into(), &request_id)
}

/// DELETE /collections/:id
pub async fn delete_collection(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeletedView> {
    let id = path_id(id, &request_id)?;
    let deleted =
        app_state.orchestrator.delete_collection(id).await.map_err(|e| fail(e, &request_id))?;
    ok(DeletedView { id, deleted }, &request_id)
}
