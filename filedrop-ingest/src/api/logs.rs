//! Audit log listing endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::scheduler_log;
use crate::error::ApiResult;
use crate::models::SchedulerLogEntry;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 200;

/// GET /logs query parameters
#[derive(Debug, Deserialize)]
pub struct LogListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// GET /logs response
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub page: u32,
    pub size: u32,
    pub total: i64,
    pub entries: Vec<SchedulerLogEntry>,
}

/// GET /logs?page&size
///
/// Paginated audit listing, newest first. `page` is 1-based.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogListQuery>,
) -> ApiResult<Json<LogListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let size = query
        .size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let total = scheduler_log::count_entries(&state.db).await?;
    let entries = scheduler_log::list_entries(&state.db, page, size).await?;

    Ok(Json(LogListResponse {
        page,
        size,
        total,
        entries,
    }))
}

/// Build audit log routes
pub fn log_routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs))
}
