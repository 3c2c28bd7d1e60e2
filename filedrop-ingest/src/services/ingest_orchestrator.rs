//! Batch pass orchestration
//!
//! One pass sweeps every tenant and both categories: ensure folders →
//! scan → dispatch each file. Both trigger paths (scheduler and manual
//! API call) funnel through `run_pass`, guarded by a run-scoped try-lock
//! so at most one ingestion pass is active system-wide.
//!
//! Processing is strictly sequential within a pass; worst-case duration
//! is bounded by total file count times collaborator latency. There is no
//! per-file timeout: a hanging collaborator blocks the whole pass.

use crate::db::users;
use crate::models::{ImportCategory, ImportStatus, PassSummary, TriggerOrigin};
use crate::services::file_scanner::list_pending_files;
use crate::services::folder_lifecycle::ensure_folders;
use crate::services::import_dispatcher::ImportDispatcher;
use crate::services::importer::Importers;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

/// Why a batch pass did not produce a summary
#[derive(Debug, Error)]
pub enum PassError {
    /// Another pass (scheduled or manual) is currently active
    #[error("An ingestion pass is already running")]
    AlreadyRunning,

    /// Tenant enumeration failed; nothing was scanned or moved
    #[error("Ingestion pass aborted: {0}")]
    Aborted(#[from] filedrop_common::Error),
}

/// Runs batch passes over the drop-folder tree
pub struct IngestOrchestrator {
    db: SqlitePool,
    base: PathBuf,
    dispatcher: ImportDispatcher,
    pass_lock: Mutex<()>,
    pass_active: AtomicBool,
}

impl IngestOrchestrator {
    pub fn new(db: SqlitePool, base: PathBuf, importers: Importers) -> Self {
        let dispatcher = ImportDispatcher::new(db.clone(), base.clone(), importers);
        Self {
            db,
            base,
            dispatcher,
            pass_lock: Mutex::new(()),
            pass_active: AtomicBool::new(false),
        }
    }

    /// Whether a pass is currently running (observability only)
    pub fn is_pass_active(&self) -> bool {
        self.pass_active.load(Ordering::SeqCst)
    }

    /// Run one full batch pass
    ///
    /// Rejects overlapping invocations with `PassError::AlreadyRunning`
    /// instead of racing on the filesystem. Tenant enumeration failure
    /// aborts the pass before any file is touched; everything after that
    /// point degrades per tenant/category/file.
    pub async fn run_pass(&self, origin: TriggerOrigin) -> Result<PassSummary, PassError> {
        let _guard = match self.pass_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => return Err(PassError::AlreadyRunning),
        };

        self.pass_active.store(true, Ordering::SeqCst);
        let result = self.run_pass_inner(origin).await;
        self.pass_active.store(false, Ordering::SeqCst);
        result
    }

    async fn run_pass_inner(&self, origin: TriggerOrigin) -> Result<PassSummary, PassError> {
        let started = std::time::Instant::now();
        tracing::info!(origin = %origin, "Starting ingestion pass");

        let tenants = users::list_company_codes(&self.db).await?;

        let mut summary = PassSummary {
            tenants: tenants.len(),
            ..Default::default()
        };

        for tenant in &tenants {
            ensure_folders(&self.base, tenant);

            for category in ImportCategory::ALL {
                let pending = list_pending_files(&self.base, tenant, category);
                if pending.is_empty() {
                    continue;
                }

                tracing::info!(
                    tenant = %tenant,
                    category = %category,
                    "Found {} pending file(s)",
                    pending.len()
                );

                for file in &pending {
                    let entry = self.dispatcher.process(tenant, category, file, origin).await;
                    summary.files_processed += 1;
                    match entry.status {
                        ImportStatus::Success => summary.succeeded += 1,
                        ImportStatus::Failed => summary.failed += 1,
                    }
                }
            }
        }

        tracing::info!(
            origin = %origin,
            tenants = summary.tenants,
            files = summary.files_processed,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ingestion pass complete"
        );

        Ok(summary)
    }
}
