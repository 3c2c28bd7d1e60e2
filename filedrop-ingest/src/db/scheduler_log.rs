//! Scheduler audit log database operations
//!
//! Append-only: rows are inserted once per processed file and never
//! updated or deleted by this service.

use sqlx::{Row, SqlitePool};

use crate::models::{ImportCategory, ImportStatus, SchedulerLogEntry, TriggerOrigin};
use filedrop_common::{Error, Result};

/// Persist one audit row
pub async fn insert_entry(pool: &SqlitePool, entry: &SchedulerLogEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scheduler_logs (
            company_code, import_type, file_name, file_path,
            status, created_count, updated_count, error_count,
            error_message, triggered_by, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.company_code)
    .bind(entry.import_type.folder_name())
    .bind(&entry.file_name)
    .bind(&entry.file_path)
    .bind(entry.status.as_str())
    .bind(entry.created_count)
    .bind(entry.updated_count)
    .bind(entry.error_count)
    .bind(&entry.error_message)
    .bind(entry.triggered_by.as_str())
    .bind(entry.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Total number of audit rows
pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scheduler_logs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// List audit rows, newest first
///
/// `page` is 1-based; callers are expected to clamp `size`.
pub async fn list_entries(pool: &SqlitePool, page: u32, size: u32) -> Result<Vec<SchedulerLogEntry>> {
    let offset = (page.saturating_sub(1) as i64) * size as i64;

    let rows = sqlx::query(
        r#"
        SELECT id, company_code, import_type, file_name, file_path,
               status, created_count, updated_count, error_count,
               error_message, triggered_by, created_at
        FROM scheduler_logs
        ORDER BY id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(size as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SchedulerLogEntry> {
    let import_type: String = row.get("import_type");
    let import_type = ImportCategory::parse(&import_type)
        .ok_or_else(|| Error::Internal(format!("Unknown import_type in log row: {}", import_type)))?;

    let status: String = row.get("status");
    let status = ImportStatus::parse(&status)
        .ok_or_else(|| Error::Internal(format!("Unknown status in log row: {}", status)))?;

    let triggered_by: String = row.get("triggered_by");
    let triggered_by = TriggerOrigin::parse(&triggered_by)
        .ok_or_else(|| Error::Internal(format!("Unknown trigger origin in log row: {}", triggered_by)))?;

    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    Ok(SchedulerLogEntry {
        id: Some(row.get("id")),
        company_code: row.get("company_code"),
        import_type,
        file_name: row.get("file_name"),
        file_path: row.get("file_path"),
        status,
        created_count: row.get("created_count"),
        updated_count: row.get("updated_count"),
        error_count: row.get("error_count"),
        error_message: row.get("error_message"),
        triggered_by,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_entry(company_code: &str, file_name: &str) -> SchedulerLogEntry {
        SchedulerLogEntry {
            id: None,
            company_code: company_code.to_string(),
            import_type: ImportCategory::AgencyList,
            file_name: file_name.to_string(),
            file_path: format!("/base/{}/AgencyList/{}", company_code, file_name),
            status: ImportStatus::Success,
            created_count: 3,
            updated_count: 1,
            error_count: 0,
            error_message: None,
            triggered_by: TriggerOrigin::Manual,
            created_at: Utc::now(),
        }
    }

    // Single persistent connection so the in-memory database survives
    // pool reconnects
    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        filedrop_common::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let pool = test_pool().await;
        insert_entry(&pool, &sample_entry("ACME", "a.xlsx")).await.unwrap();

        let entries = list_entries(&pool, 1, 20).await.unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert!(entry.id.is_some());
        assert_eq!(entry.company_code, "ACME");
        assert_eq!(entry.import_type, ImportCategory::AgencyList);
        assert_eq!(entry.status, ImportStatus::Success);
        assert_eq!(entry.created_count, 3);
        assert_eq!(entry.triggered_by, TriggerOrigin::Manual);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paginated() {
        let pool = test_pool().await;
        for i in 0..5 {
            insert_entry(&pool, &sample_entry("ACME", &format!("file{}.xlsx", i)))
                .await
                .unwrap();
        }

        assert_eq!(count_entries(&pool).await.unwrap(), 5);

        let first_page = list_entries(&pool, 1, 2).await.unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].file_name, "file4.xlsx");
        assert_eq!(first_page[1].file_name, "file3.xlsx");

        let third_page = list_entries(&pool, 3, 2).await.unwrap();
        assert_eq!(third_page.len(), 1);
        assert_eq!(third_page[0].file_name, "file0.xlsx");
    }
}
