//! REST API router

use super::handlers::{collections, health, params, requests, responses};
use crate::{middleware::RequestIdLayer, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome))
        .route("/ping", get(health::ping))
        .route("/health", get(health::health_check))
        .route(
            "/collections",
            post(collections::create_collection).get(collections::list_collections),
        )
        .route(
            "/collections/:id",
            get(collections::get_collection)
                .patch(collections::rename_collection)
                .delete(collections::delete_collection),
        )
        .route("/collections/:id/requests", get(collections::list_collection_requests))
        .route("/requests", post(requests::save_and_send))
        .route("/requests/:id", get(requests::get_request).delete(requests::delete_request))
        .route("/params", post(params::add_param).get(params::list_params))
        .route("/params/:id", axum::routing::put(params::update_param).delete(params::delete_param))
        .route("/responses", post(responses::save_response))
        .route(
            "/responses/:id",
            get(responses::get_response)
                .put(responses::update_response)
                .delete(responses::delete_response),
        )
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer)
        .with_state(app_state)
}
