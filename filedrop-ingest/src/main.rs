//! filedrop-ingest - Multi-tenant spreadsheet ingestion service
//!
//! Scans per-company drop folders for spreadsheet files, hands each file
//! to its import collaborator, archives it into the success or failed
//! area, and records one audit row per file. Passes run on a fixed-delay
//! scheduler and on demand via the HTTP API.
//!
//! Usage: `filedrop-ingest [base-folder]`

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use filedrop_ingest::config::IngestConfig;
use filedrop_ingest::models::{ImportCategory, RunStatus};
use filedrop_ingest::services::{
    scheduler, HttpImporter, Importers, IngestOrchestrator, SpreadsheetImporter,
    UnconfiguredImporter,
};
use filedrop_ingest::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting filedrop-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve configuration (CLI arg -> env -> TOML -> defaults)
    let cli_base = std::env::args().nth(1);
    let toml_config = filedrop_common::config::load_default_toml_config();
    let config = IngestConfig::resolve(cli_base.as_deref(), &toml_config);
    info!("Base folder: {}", config.base_folder.display());
    info!(
        "Scheduler: enabled={} interval={}h",
        config.scheduler_enabled, config.interval_hours
    );

    // Step 2: Create base folder if missing
    filedrop_common::config::ensure_base_folder(&config.base_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize base folder: {}", e))?;

    // Step 3: Open or create database
    let db_path = filedrop_common::config::database_path(&config.base_folder);
    info!("Database: {}", db_path.display());
    let db_pool = filedrop_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Step 4: Wire import collaborators
    let agency = build_importer(
        ImportCategory::AgencyList,
        config.agency_import_url.as_deref(),
    )?;
    let policy = build_importer(
        ImportCategory::PolicyList,
        config.policy_import_url.as_deref(),
    )?;
    let importers = Importers::new(agency, policy);

    // Step 5: Orchestrator, run status, scheduler
    let orchestrator = Arc::new(IngestOrchestrator::new(
        db_pool.clone(),
        config.base_folder.clone(),
        importers,
    ));
    let run_status = Arc::new(RwLock::new(RunStatus::new(
        config.scheduler_enabled,
        config.interval_hours,
    )));

    let cancel = CancellationToken::new();
    let scheduler_handle = scheduler::spawn_scheduler(
        orchestrator.clone(),
        run_status.clone(),
        cancel.clone(),
    );

    // Step 6: HTTP server
    let state = AppState::new(
        db_pool,
        config.base_folder.clone(),
        orchestrator,
        run_status,
    );
    let app = filedrop_ingest::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}", config.bind_address);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    // Let the scheduler task observe the cancellation before exit
    let _ = scheduler_handle.await;

    Ok(())
}

fn build_importer(
    category: ImportCategory,
    endpoint: Option<&str>,
) -> Result<Arc<dyn SpreadsheetImporter>> {
    match endpoint {
        Some(url) => {
            info!("{} importer endpoint: {}", category, url);
            Ok(Arc::new(HttpImporter::new(url.to_string())?))
        }
        None => {
            tracing::warn!(
                "No import endpoint configured for {}; its files will be classified FAILED",
                category
            );
            Ok(Arc::new(UnconfiguredImporter::new(category)))
        }
    }
}
