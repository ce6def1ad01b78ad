use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{
    request_id::{make_span_with_request_id, request_id_middleware},
    timeout::timeout_middleware,
};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route("/recommend", get(handlers::recommend))
        .route("/model", get(handlers::model_info))
        // Voice assistant
        .route("/voice", post(handlers::voice))
        .with_state(state)
}

/// Wraps the router with tracing, request ids, CORS and a request timeout
pub fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(middleware::from_fn_with_state(request_timeout, timeout_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}
