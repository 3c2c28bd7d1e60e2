//! Domain types for the ingestion pipeline

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The two supported import categories
///
/// Each category maps to one physical subfolder under a tenant's drop
/// folder and one external import collaborator. The closed enum makes the
/// collaborator selection exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportCategory {
    AgencyList,
    PolicyList,
}

impl ImportCategory {
    /// Fixed iteration order for a batch pass
    pub const ALL: [ImportCategory; 2] = [ImportCategory::AgencyList, ImportCategory::PolicyList];

    /// Physical subfolder name under `<base>/<tenant>/`
    pub fn folder_name(&self) -> &'static str {
        match self {
            ImportCategory::AgencyList => "AgencyList",
            ImportCategory::PolicyList => "PolicyList",
        }
    }

    /// Parse a category from user input (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "agencylist" | "agency_list" => Some(ImportCategory::AgencyList),
            "policylist" | "policy_list" => Some(ImportCategory::PolicyList),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// What caused a batch pass to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOrigin {
    #[serde(rename = "SCHEDULER")]
    Scheduler,
    #[serde(rename = "MANUAL")]
    Manual,
}

impl TriggerOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerOrigin::Scheduler => "SCHEDULER",
            TriggerOrigin::Manual => "MANUAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULER" => Some(TriggerOrigin::Scheduler),
            "MANUAL" => Some(TriggerOrigin::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for TriggerOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch-level outcome for one processed file
///
/// Row-level errors reported by a collaborator are informational; the file
/// still counts as `Success`. `Failed` means the collaborator itself errored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Success => "SUCCESS",
            ImportStatus::Failed => "FAILED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SUCCESS" => Some(ImportStatus::Success),
            "FAILED" => Some(ImportStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row-level error reported by an import collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub row: u32,
    pub column: String,
    pub message: String,
}

/// Counters returned by an import collaborator for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
    #[serde(default)]
    pub errors: Vec<RowError>,
}

/// Immutable audit row, one per processed file
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerLogEntry {
    /// Database id (None before insertion)
    pub id: Option<i64>,
    pub company_code: String,
    pub import_type: ImportCategory,
    pub file_name: String,
    /// Absolute source path the file was discovered at
    pub file_path: String,
    pub status: ImportStatus,
    pub created_count: i64,
    pub updated_count: i64,
    pub error_count: i64,
    /// Truncated detail: up to five formatted row errors, or the
    /// collaborator's error text on failure
    pub error_message: Option<String>,
    pub triggered_by: TriggerOrigin,
    pub created_at: DateTime<Utc>,
}

/// A spreadsheet awaiting import in a tenant/category folder
#[derive(Debug, Clone, Serialize)]
pub struct PendingFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Scheduler observability state
///
/// Explicit value held in app state (not ambient process globals); the
/// scheduler task updates `last_scheduled_run` before each pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub enabled: bool,
    pub interval_hours: u32,
    pub last_scheduled_run: Option<DateTime<Utc>>,
}

impl RunStatus {
    pub fn new(enabled: bool, interval_hours: u32) -> Self {
        Self {
            enabled,
            interval_hours,
            last_scheduled_run: None,
        }
    }

    /// Next estimated fire time, for observability only
    pub fn next_estimated_run(&self) -> Option<DateTime<Utc>> {
        if !self.enabled {
            return None;
        }
        self.last_scheduled_run
            .map(|last| last + Duration::hours(self.interval_hours as i64))
    }
}

/// Result of one full batch pass across all tenants and categories
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassSummary {
    pub tenants: usize,
    pub files_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}
