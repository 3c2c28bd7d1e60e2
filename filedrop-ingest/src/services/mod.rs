//! Service modules for the ingestion pipeline
//!
//! Component responsibilities, leaves first: folder lifecycle and file
//! scanning feed the dispatcher, which calls the import collaborators and
//! the archive manager; the orchestrator sweeps all tenants; the
//! scheduler is the timed trigger path.

pub mod archive_manager;
pub mod file_scanner;
pub mod folder_lifecycle;
pub mod import_client;
pub mod import_dispatcher;
pub mod importer;
pub mod ingest_orchestrator;
pub mod scheduler;
pub mod uploads;

pub use import_client::{HttpImporter, ImportClientError};
pub use import_dispatcher::ImportDispatcher;
pub use importer::{Importers, SpreadsheetImporter, UnconfiguredImporter};
pub use ingest_orchestrator::{IngestOrchestrator, PassError};
pub use uploads::UploadError;
