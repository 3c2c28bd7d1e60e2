//! Scheduled trigger
//!
//! Fixed-delay background task: the next fire is only scheduled after the
//! previous pass completes, so the scheduler can never overlap itself.
//! Overlap with a manual run is handled by the orchestrator's try-lock.
//! Shutdown is cooperative via a cancellation token.

use crate::models::{RunStatus, TriggerOrigin};
use crate::services::ingest_orchestrator::{IngestOrchestrator, PassError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Spawn the fixed-delay scheduler task
///
/// The first pass fires one interval after startup. The `enabled` flag is
/// re-read on every fire, so disabling it only parks the scheduled path;
/// manual runs stay available.
pub fn spawn_scheduler(
    orchestrator: Arc<IngestOrchestrator>,
    run_status: Arc<RwLock<RunStatus>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let interval_hours = run_status.read().await.interval_hours;
            let delay = Duration::from_secs(interval_hours as u64 * 3600);

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler shutting down");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            scheduled_fire(&orchestrator, &run_status).await;
        }
    })
}

/// One scheduled fire: check the enabled flag, record the attempt, run
/// the pass. Returns whether a pass was actually run.
pub async fn scheduled_fire(
    orchestrator: &IngestOrchestrator,
    run_status: &RwLock<RunStatus>,
) -> bool {
    if !run_status.read().await.enabled {
        tracing::debug!("Scheduler disabled, skipping fire");
        return false;
    }

    // Record the fire before running, so observers see the attempt even
    // if the pass aborts
    run_status.write().await.last_scheduled_run = Some(chrono::Utc::now());

    match orchestrator.run_pass(TriggerOrigin::Scheduler).await {
        Ok(summary) => {
            tracing::info!(
                files = summary.files_processed,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Scheduled pass finished"
            );
            true
        }
        Err(PassError::AlreadyRunning) => {
            tracing::warn!("Scheduled fire skipped: a pass is already running");
            false
        }
        Err(PassError::Aborted(e)) => {
            tracing::error!("Scheduled pass aborted, will retry next fire: {}", e);
            false
        }
    }
}
