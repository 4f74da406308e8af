//! Param handlers

use super::{fail, json_body, ok, path_id, query, ApiResult};
use crate::{
    dto::{ParamView, ParamsListing, ParamsQuery},
    middleware::RequestId,
    AppState,
};
use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    Extension, Json, Path, Query, State,
};
use postlab_core::{NewParam, Param, ParamUpdate};
use serde_json::{json, Value};

/// POST /params
pub async fn add_param(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<NewParam>, JsonRejection>,
) -> ApiResult<Param> {
    let param = json_body(payload, &request_id)?;
    let param = app_state.orchestrator.add_param(param).await.map_err(|e| fail(e, &request_id))?;
    ok(param, &request_id)
}

/// GET /params?request_id=
pub async fn list_params(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<ParamsQuery>, QueryRejection>,
) -> ApiResult<ParamsListing> {
    let ParamsQuery { request_id: owner } = query(params, &request_id)?;
    let params =
        app_state.orchestrator.list_params(owner).await.map_err(|e| fail(e, &request_id))?;
    ok(
        ParamsListing { request_id: owner, params: params.into_iter().map(ParamView::from).collect() },
        &request_id,
    )
}

/// PUT /params/:id
pub async fn update_param(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ParamUpdate>, JsonRejection>,
) -> ApiResult<Param> {
    let id = path_id(id, &request_id)?;
    let update = json_body(payload, &request_id)?;
    let param =
        app_state.orchestrator.update_param(id, update).await.map_err(|e| fail(e, &request_id))?;
    ok(param, &request_id)
}

/// DELETE /params/:id
pub async fn delete_param(
    State(app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let id = path_id(id, &request_id)?;
    app_state.orchestrator.delete_param(id).await.map_err(|e| fail(e, &request_id))?;
    ok(json!({"id": id}), &request_id)
}
