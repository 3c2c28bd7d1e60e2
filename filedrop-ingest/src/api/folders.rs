//! Drop-folder listing endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::users;
use crate::error::ApiResult;
use crate::models::{ImportCategory, PendingFile};
use crate::services::file_scanner::list_pending_files;
use crate::AppState;

/// Pending files for one category of one tenant
#[derive(Debug, Serialize)]
pub struct CategoryListing {
    pub category: ImportCategory,
    pub files: Vec<PendingFile>,
}

/// Pending files for one tenant, both categories
#[derive(Debug, Serialize)]
pub struct TenantListing {
    pub company_code: String,
    pub categories: Vec<CategoryListing>,
}

/// GET /folders response
#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    pub tenants: Vec<TenantListing>,
}

/// GET /folders
///
/// Per tenant, per category: pending file name, path, size and last
/// modified time. Tenants come from the user store, so a tenant with no
/// folders yet still appears (with empty listings).
pub async fn list_folders(State(state): State<AppState>) -> ApiResult<Json<FolderListResponse>> {
    let codes = users::list_company_codes(&state.db).await?;

    let tenants = codes
        .into_iter()
        .map(|company_code| {
            let categories = ImportCategory::ALL
                .into_iter()
                .map(|category| CategoryListing {
                    category,
                    files: list_pending_files(&state.base_folder, &company_code, category),
                })
                .collect();
            TenantListing {
                company_code,
                categories,
            }
        })
        .collect();

    Ok(Json(FolderListResponse { tenants }))
}

/// Build folder listing routes
pub fn folder_routes() -> Router<AppState> {
    Router::new().route("/folders", get(list_folders))
}
