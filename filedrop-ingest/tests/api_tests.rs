//! HTTP API integration tests
//!
//! Exercise the axum router directly with `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;
use tower::ServiceExt;

use filedrop_ingest::db::scheduler_log;
use filedrop_ingest::models::{
    ImportCategory, ImportStatus, ImportSummary, RunStatus, SchedulerLogEntry, TriggerOrigin,
};
use filedrop_ingest::services::{Importers, IngestOrchestrator, SpreadsheetImporter};
use filedrop_ingest::{build_router, AppState};

struct OkImporter;

#[async_trait]
impl SpreadsheetImporter for OkImporter {
    async fn import(
        &self,
        _company_code: &str,
        _file: &Path,
        _overwrite: bool,
        _actor: &str,
    ) -> anyhow::Result<ImportSummary> {
        Ok(ImportSummary {
            created: 4,
            updated: 1,
            errors: Vec::new(),
        })
    }
}

// Single persistent connection so the in-memory database survives pool
// reconnects
async fn test_pool_with_tenants(tenants: &[&str]) -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    filedrop_common::db::init_tables(&pool).await.unwrap();
    for (i, tenant) in tenants.iter().enumerate() {
        sqlx::query("INSERT INTO users (username, company_code, created_at) VALUES (?, ?, datetime('now'))")
            .bind(format!("user{}", i))
            .bind(tenant)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

async fn test_state(pool: SqlitePool, base: &Path) -> AppState {
    let importers = Importers::new(Arc::new(OkImporter), Arc::new(OkImporter));
    let orchestrator = Arc::new(IngestOrchestrator::new(
        pool.clone(),
        base.to_path_buf(),
        importers,
    ));
    let run_status = Arc::new(RwLock::new(RunStatus::new(true, 1)));
    AppState::new(pool, base.to_path_buf(), orchestrator, run_status)
}

async fn json_response(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_request(
    company_code: &str,
    category: &str,
    file_name: &str,
    bytes: &[u8],
) -> Request<Body> {
    let boundary = "filedrop-test-boundary";
    let mut body = Vec::new();
    for (name, value) in [("company_code", company_code), ("category", category)] {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&[]).await;
    let app = build_router(test_state(pool, base.path()).await);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "filedrop-ingest");
}

#[tokio::test]
async fn manual_trigger_processes_pending_files() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;

    let dir = base.path().join("ACME/AgencyList");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("list.xlsx"), b"bytes").unwrap();

    let app = build_router(test_state(pool.clone(), base.path()).await);

    let response = app
        .oneshot(Request::post("/ingest/run").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    assert_eq!(json["tenants"], 1);
    assert_eq!(json["files_processed"], 1);
    assert_eq!(json["succeeded"], 1);
    assert_eq!(json["failed"], 0);

    assert!(dir.read_dir().unwrap().next().is_none());
    assert_eq!(scheduler_log::count_entries(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn status_exposes_scheduler_state() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&[]).await;
    let app = build_router(test_state(pool, base.path()).await);

    let response = app
        .oneshot(Request::get("/ingest/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    assert_eq!(json["scheduler_enabled"], true);
    assert_eq!(json["interval_hours"], 1);
    assert_eq!(json["pass_active"], false);
    assert!(json["last_scheduled_run"].is_null());
}

#[tokio::test]
async fn log_listing_is_paginated_newest_first() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&[]).await;

    for i in 0..3i64 {
        let entry = SchedulerLogEntry {
            id: None,
            company_code: "ACME".to_string(),
            import_type: ImportCategory::AgencyList,
            file_name: format!("file{}.xlsx", i),
            file_path: format!("/base/ACME/AgencyList/file{}.xlsx", i),
            status: ImportStatus::Success,
            created_count: i,
            updated_count: 0,
            error_count: 0,
            error_message: None,
            triggered_by: TriggerOrigin::Scheduler,
            created_at: chrono::Utc::now(),
        };
        scheduler_log::insert_entry(&pool, &entry).await.unwrap();
    }

    let app = build_router(test_state(pool, base.path()).await);
    let response = app
        .oneshot(
            Request::get("/logs?page=1&size=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["size"], 2);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["file_name"], "file2.xlsx");
    assert_eq!(entries[1]["file_name"], "file1.xlsx");
    assert_eq!(entries[0]["status"], "SUCCESS");
    assert_eq!(entries[0]["triggered_by"], "SCHEDULER");
}

#[tokio::test]
async fn folder_listing_shows_pending_files_per_tenant() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;

    let dir = base.path().join("ACME/PolicyList");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("pol.xls"), b"12345").unwrap();

    let app = build_router(test_state(pool, base.path()).await);
    let response = app
        .oneshot(Request::get("/folders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    let tenants = json["tenants"].as_array().unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0]["company_code"], "ACME");

    let categories = tenants[0]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    let policy = categories
        .iter()
        .find(|c| c["category"] == "PolicyList")
        .unwrap();
    let files = policy["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file_name"], "pol.xls");
    assert_eq!(files[0]["size"], 5);
}

#[tokio::test]
async fn upload_stores_into_pending_folder() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;
    let app = build_router(test_state(pool, base.path()).await);

    let response = app
        .oneshot(multipart_request("ACME", "AgencyList", "list.xlsx", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    assert_eq!(json["company_code"], "ACME");
    assert_eq!(json["category"], "AgencyList");
    assert_eq!(json["stored_as"], "list.xlsx");

    let stored = base.path().join("ACME/AgencyList/list.xlsx");
    assert_eq!(fs::read(&stored).unwrap(), b"data");
}

#[tokio::test]
async fn upload_rejects_wrong_extension_and_empty_file() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;
    let state = test_state(pool, base.path()).await;

    let response = build_router(state.clone())
        .oneshot(multipart_request("ACME", "AgencyList", "list.csv", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = build_router(state)
        .oneshot(multipart_request("ACME", "AgencyList", "list.xlsx", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_unknown_category() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;
    let app = build_router(test_state(pool, base.path()).await);

    let response = app
        .oneshot(multipart_request("ACME", "MemberList", "list.xlsx", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_response(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn upload_collision_gets_timestamp_suffix() {
    let base = TempDir::new().unwrap();
    let pool = test_pool_with_tenants(&["ACME"]).await;
    let state = test_state(pool, base.path()).await;

    let response = build_router(state.clone())
        .oneshot(multipart_request("ACME", "PolicyList", "pol.xls", b"first"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(multipart_request("ACME", "PolicyList", "pol.xls", b"second"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_response(response).await;
    let stored_as = json["stored_as"].as_str().unwrap();
    assert_ne!(stored_as, "pol.xls");
    assert!(stored_as.starts_with("pol_"));
    assert!(stored_as.ends_with(".xls"));

    // Original untouched
    let original = base.path().join("ACME/PolicyList/pol.xls");
    assert_eq!(fs::read(&original).unwrap(), b"first");

    let count = fs::read_dir(base.path().join("ACME/PolicyList"))
        .unwrap()
        .count();
    assert_eq!(count, 2);
}
