//! Per-file processing orchestration
//!
//! Routes one discovered file to its import collaborator, classifies the
//! outcome, archives the file, and persists the audit row. All failure
//! modes are absorbed here: a file can fail, its archival can fail, its
//! audit insert can fail, and the batch still continues with the next
//! file.

use crate::db::scheduler_log;
use crate::models::{
    ImportCategory, ImportStatus, PendingFile, RowError, SchedulerLogEntry, TriggerOrigin,
};
use crate::services::archive_manager;
use crate::services::importer::{Importers, PIPELINE_ACTOR};
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::PathBuf;

/// Row errors beyond this count are dropped from the audit message
const MAX_LOGGED_ROW_ERRORS: usize = 5;

/// Format the first few row errors for the audit message
///
/// Format per error: `Row <n>, <column>: <message>`, semicolon-joined.
pub fn format_row_errors(errors: &[RowError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let joined = errors
        .iter()
        .take(MAX_LOGGED_ROW_ERRORS)
        .map(|e| format!("Row {}, {}: {}", e.row, e.column, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}

/// Dispatches discovered files to the import collaborators
pub struct ImportDispatcher {
    db: SqlitePool,
    base: PathBuf,
    importers: Importers,
}

impl ImportDispatcher {
    pub fn new(db: SqlitePool, base: PathBuf, importers: Importers) -> Self {
        Self {
            db,
            base,
            importers,
        }
    }

    /// Process one discovered file end to end
    ///
    /// Guarantees exactly one archival action and exactly one audit row
    /// per call, regardless of outcome. Collaborator failures are fatal
    /// only to this file and never propagate.
    pub async fn process(
        &self,
        tenant: &str,
        category: ImportCategory,
        file: &PendingFile,
        origin: TriggerOrigin,
    ) -> SchedulerLogEntry {
        tracing::info!(
            tenant = %tenant,
            category = %category,
            file = %file.file_name,
            origin = %origin,
            "Processing pending file"
        );

        let importer = self.importers.for_category(category);
        let result = importer
            .import(tenant, &file.path, false, PIPELINE_ACTOR)
            .await;

        let entry = match result {
            Ok(summary) => {
                // Row errors are informational: the file still succeeded
                if !summary.errors.is_empty() {
                    tracing::warn!(
                        tenant = %tenant,
                        file = %file.file_name,
                        "Import reported {} row error(s)",
                        summary.errors.len()
                    );
                }
                archive_manager::archive_success(&self.base, &file.path, tenant, category);

                SchedulerLogEntry {
                    id: None,
                    company_code: tenant.to_string(),
                    import_type: category,
                    file_name: file.file_name.clone(),
                    file_path: file.path.display().to_string(),
                    status: ImportStatus::Success,
                    created_count: summary.created as i64,
                    updated_count: summary.updated as i64,
                    error_count: summary.errors.len() as i64,
                    error_message: format_row_errors(&summary.errors),
                    triggered_by: origin,
                    created_at: Utc::now(),
                }
            }
            Err(e) => {
                let detail = e.to_string();
                tracing::error!(
                    tenant = %tenant,
                    category = %category,
                    file = %file.file_name,
                    "Import failed: {}",
                    detail
                );
                archive_manager::archive_failure(&self.base, &file.path, tenant, category, &detail);

                SchedulerLogEntry {
                    id: None,
                    company_code: tenant.to_string(),
                    import_type: category,
                    file_name: file.file_name.clone(),
                    file_path: file.path.display().to_string(),
                    status: ImportStatus::Failed,
                    created_count: 0,
                    updated_count: 0,
                    error_count: 1,
                    error_message: Some(detail),
                    triggered_by: origin,
                    created_at: Utc::now(),
                }
            }
        };

        // A failed audit insert must not stop processing of later files
        if let Err(e) = scheduler_log::insert_entry(&self.db, &entry).await {
            tracing::error!(
                tenant = %tenant,
                file = %file.file_name,
                "Failed to persist audit row: {}",
                e
            );
        }

        entry
    }
}
