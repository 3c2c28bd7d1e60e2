//! Tenant directory queries
//!
//! Tenant codes are derived from the `users` table, which is owned by the
//! member-management service. This module only ever reads from it.

use filedrop_common::Result;
use sqlx::SqlitePool;

/// List distinct tenant codes currently in use by registered users
///
/// Null and blank codes are discarded; the result is trimmed, de-duplicated
/// and sorted so a batch pass iterates tenants deterministically. Errors
/// propagate: without a tenant list no partial pass is attempted.
pub async fn list_company_codes(pool: &SqlitePool) -> Result<Vec<String>> {
    let codes: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT TRIM(company_code)
        FROM users
        WHERE company_code IS NOT NULL AND TRIM(company_code) != ''
        ORDER BY TRIM(company_code)
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(codes)
}
