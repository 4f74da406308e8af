//! Health check handlers

use super::{ok, ApiResult};
use crate::{middleware::RequestId, AppState};
use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde_json::{json, Value};

/// GET /
pub async fn welcome() -> Json<Value> {
    Json(json!({"message": "Welcome to the postlab API"}))
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({"ping": "pong!"}))
}

/// GET /health
pub async fn health_check(
    State(_app_state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Value> {
    ok(
        json!({
            "status": "healthy",
            "service": "postlab-server",
            "version": env!("CARGO_PKG_VERSION")
        }),
        &request_id,
    )
}
