//! Manual trigger and scheduler status endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{PassSummary, TriggerOrigin};
use crate::services::PassError;
use crate::AppState;

/// GET /ingest/status response
#[derive(Debug, Serialize)]
pub struct IngestStatusResponse {
    pub scheduler_enabled: bool,
    pub interval_hours: u32,
    pub last_scheduled_run: Option<DateTime<Utc>>,
    pub next_estimated_run: Option<DateTime<Utc>>,
    pub pass_active: bool,
}

/// POST /ingest/run
///
/// Runs one full batch pass synchronously on the caller's request,
/// independent of the scheduler's enabled flag. Returns 409 when a pass
/// (scheduled or manual) is already active.
pub async fn run_ingest(State(state): State<AppState>) -> ApiResult<Json<PassSummary>> {
    match state.orchestrator.run_pass(TriggerOrigin::Manual).await {
        Ok(summary) => Ok(Json(summary)),
        Err(PassError::AlreadyRunning) => Err(ApiError::Conflict(
            "An ingestion pass is already running".to_string(),
        )),
        Err(PassError::Aborted(e)) => Err(ApiError::Internal(format!(
            "Ingestion pass aborted: {}",
            e
        ))),
    }
}

/// GET /ingest/status
pub async fn ingest_status(State(state): State<AppState>) -> Json<IngestStatusResponse> {
    let run_status = state.run_status.read().await;

    Json(IngestStatusResponse {
        scheduler_enabled: run_status.enabled,
        interval_hours: run_status.interval_hours,
        last_scheduled_run: run_status.last_scheduled_run,
        next_estimated_run: run_status.next_estimated_run(),
        pass_active: state.orchestrator.is_pass_active(),
    })
}

/// Build ingest trigger routes
pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/ingest/run", post(run_ingest))
        .route("/ingest/status", get(ingest_status))
}
