//! Health check handlers

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "ready", "timeout", or "not_ready: {error}".
async fn run_check<F, E>(name: &str, f: F) -> (bool, String)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(CHECK_TIMEOUT, f).await {
        Ok(Ok(())) => (true, "ready".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, check = name, "Readiness check failed");
            (false, format!("not_ready: {}", e))
        }
        Err(_) => {
            tracing::error!(check = name, "Readiness check timed out");
            (false, "timeout".to_string())
        }
    }
}

#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    record_store: String,
    storage: String,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - record store and asset root.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (store_ok, record_store) = run_check("record_store", state.videos.health_check()).await;
    let (storage_ok, storage) = run_check("storage", state.storage.health_check()).await;

    let ready = store_ok && storage_ok;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" },
            record_store,
            storage,
        }),
    )
}
