//! Route configuration and setup

mod health;

use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Room for multipart boundaries and part headers on top of the payload itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let config = &state.config;
    let assets_path = format!("/{}", config.assets_route.trim_matches('/'));
    let body_limit = config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    api_routes()
        .nest_service(&assets_path, ServeDir::new(&config.assets_root))
        .merge(public_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Health probes and the OpenAPI document
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Video and thumbnail endpoints. Handlers that need a caller take `AuthUser`.
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/videos", post(handlers::videos::create_video))
        .route("/api/videos/{videoID}", get(handlers::videos::get_video))
        .route(
            "/api/thumbnail_upload/{videoID}",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
}
