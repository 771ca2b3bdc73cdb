use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use super::error::ApiError;
use super::models::{DownloadRequest, DownloadStarted, HealthResponse};
use super::state::AppState;

/// Job submission endpoint (POST /download).
///
/// Validates the request, starts the worker pool in the background, and
/// returns `202 {"status": "started", "total": N}` without waiting for any
/// fetch. A second submission while a job is active fails with 409 and
/// leaves the running job untouched.
pub async fn start_download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = request.into_job_config(&state.config.fetch);

    let total = state
        .controller
        .submit(config)
        .inspect_err(|_| state.metrics.job_rejected())?;

    state.metrics.job_accepted();

    let response = DownloadStarted {
        status: "started".to_string(),
        total,
    };

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Status endpoint (GET /status).
///
/// Returns the current job snapshot immediately, whether or not a job is
/// running; safe to poll at any frequency.
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.status())
}

/// Health check endpoint (GET /health).
pub async fn health() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
