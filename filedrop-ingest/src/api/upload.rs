//! Manual upload endpoint

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::ImportCategory;
use crate::services::uploads::{store_upload, UploadError};
use crate::AppState;

/// POST /upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub company_code: String,
    pub category: ImportCategory,
    pub stored_as: String,
    pub stored_path: String,
    pub size: usize,
}

/// POST /upload
///
/// Multipart form with parts `file`, `company_code` and `category`.
/// Validation failures (empty file, wrong extension, blank tenant,
/// unknown category) come back as 400; a stored file lands in the pending
/// folder and is consumed by the next pass.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut company_code: Option<String> = None;
    let mut category: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let part_name = field.name().map(|n| n.to_string());
        match part_name.as_deref() {
            Some("company_code") => {
                company_code = Some(read_text(field).await?);
            }
            Some("category") => {
                category = Some(read_text(field).await?);
            }
            Some("file") => {
                file_name = field.file_name().map(|n| n.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file part: {}", e)))?;
                bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let company_code =
        company_code.ok_or_else(|| ApiError::BadRequest("Missing part: company_code".to_string()))?;
    let category_raw =
        category.ok_or_else(|| ApiError::BadRequest("Missing part: category".to_string()))?;
    let category = ImportCategory::parse(&category_raw).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Unknown category: {} (expected AgencyList or PolicyList)",
            category_raw
        ))
    })?;
    let bytes = bytes.ok_or_else(|| ApiError::BadRequest("Missing part: file".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| ApiError::BadRequest("File part has no file name".to_string()))?;

    let stored = store_upload(
        &state.base_folder,
        &company_code,
        category,
        &file_name,
        &bytes,
    )
    .map_err(|e| match e {
        UploadError::Io(err) => ApiError::Internal(format!("Failed to store upload: {}", err)),
        other => ApiError::BadRequest(other.to_string()),
    })?;

    let stored_as = stored
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.clone());

    tracing::info!(
        company_code = %company_code,
        category = %category,
        "Stored upload as {}",
        stored.display()
    );

    Ok(Json(UploadResponse {
        company_code: company_code.trim().to_string(),
        category,
        stored_as,
        stored_path: stored.display().to_string(),
        size: bytes.len(),
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {}", e)))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_file))
}
