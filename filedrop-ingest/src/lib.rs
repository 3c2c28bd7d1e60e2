//! filedrop-ingest library interface
//!
//! Exposes the application state, router, and pipeline services for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::RunStatus;
use crate::services::IngestOrchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (audit log + tenant directory)
    pub db: SqlitePool,
    /// Filesystem root with the per-tenant drop folders
    pub base_folder: PathBuf,
    /// Batch pass runner, shared with the scheduler task
    pub orchestrator: Arc<IngestOrchestrator>,
    /// Scheduler observability state
    pub run_status: Arc<RwLock<RunStatus>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        base_folder: PathBuf,
        orchestrator: Arc<IngestOrchestrator>,
        run_status: Arc<RwLock<RunStatus>>,
    ) -> Self {
        Self {
            db,
            base_folder,
            orchestrator,
            run_status,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ingest_routes())
        .merge(api::log_routes())
        .merge(api::folder_routes())
        .merge(api::upload_routes())
        .merge(api::health_routes())
        .with_state(state)
}
