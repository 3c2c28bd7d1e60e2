//! Import collaborator abstraction
//!
//! The actual spreadsheet parsing and domain upsert logic live outside
//! this service. The pipeline reaches them through this trait; production
//! wiring uses the HTTP client in `import_client`, tests inject in-memory
//! fakes.

use crate::models::{ImportCategory, ImportSummary};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Actor label handed to collaborators for records touched by this pipeline
pub const PIPELINE_ACTOR: &str = "SCHEDULER";

/// External import collaborator for one category
#[async_trait]
pub trait SpreadsheetImporter: Send + Sync {
    /// Import one spreadsheet for a tenant
    ///
    /// `overwrite` controls whether matching existing records are replaced;
    /// the pipeline always passes `false`. Row-level problems are returned
    /// inside the summary; an `Err` means the file as a whole failed.
    async fn import(
        &self,
        company_code: &str,
        file: &Path,
        overwrite: bool,
        actor: &str,
    ) -> anyhow::Result<ImportSummary>;
}

/// The closed set of collaborators, one per category
#[derive(Clone)]
pub struct Importers {
    agency: Arc<dyn SpreadsheetImporter>,
    policy: Arc<dyn SpreadsheetImporter>,
}

impl Importers {
    pub fn new(agency: Arc<dyn SpreadsheetImporter>, policy: Arc<dyn SpreadsheetImporter>) -> Self {
        Self { agency, policy }
    }

    /// Select the collaborator for a category (exhaustive by construction)
    pub fn for_category(&self, category: ImportCategory) -> &Arc<dyn SpreadsheetImporter> {
        match category {
            ImportCategory::AgencyList => &self.agency,
            ImportCategory::PolicyList => &self.policy,
        }
    }
}

/// Placeholder used when no endpoint is configured for a category
///
/// Keeps the daemon runnable with a partial configuration: affected files
/// are classified FAILED and archived instead of being retried forever.
pub struct UnconfiguredImporter {
    category: ImportCategory,
}

impl UnconfiguredImporter {
    pub fn new(category: ImportCategory) -> Self {
        Self { category }
    }
}

#[async_trait]
impl SpreadsheetImporter for UnconfiguredImporter {
    async fn import(
        &self,
        _company_code: &str,
        _file: &Path,
        _overwrite: bool,
        _actor: &str,
    ) -> anyhow::Result<ImportSummary> {
        anyhow::bail!(
            "No import endpoint configured for category {}",
            self.category
        )
    }
}
