//! Manual upload storage
//!
//! Places an operator-uploaded spreadsheet into the tenant/category drop
//! folder, where the next pass picks it up like any externally dropped
//! file. Validation happens here, before anything touches the pipeline.

use crate::models::ImportCategory;
use crate::services::archive_manager::{archive_timestamp, unique_destination};
use crate::services::file_scanner::is_spreadsheet_name;
use crate::services::folder_lifecycle::category_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upload validation and storage errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Uploaded file has no content
    #[error("Uploaded file is empty")]
    EmptyFile,

    /// File name lacks a spreadsheet extension
    #[error("Unsupported file type: {0} (expected .xlsx or .xls)")]
    UnsupportedExtension(String),

    /// Tenant code is blank
    #[error("Company code must not be blank")]
    BlankTenant,

    /// Storage failed
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate and store an uploaded spreadsheet in the pending folder
///
/// On a name collision with an existing pending file, a
/// `_yyyyMMdd_HHmmss` suffix is appended before the extension (with a
/// counter when the suffixed name is itself taken); existing files are
/// untouched. Returns the stored path.
pub fn store_upload(
    base: &Path,
    tenant: &str,
    category: ImportCategory,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, UploadError> {
    let tenant = tenant.trim();
    if tenant.is_empty() {
        return Err(UploadError::BlankTenant);
    }
    if bytes.is_empty() {
        return Err(UploadError::EmptyFile);
    }
    if !is_spreadsheet_name(file_name) {
        return Err(UploadError::UnsupportedExtension(file_name.to_string()));
    }

    let dir = category_dir(base, tenant, category);
    std::fs::create_dir_all(&dir)?;

    let mut target = dir.join(file_name);
    if target.exists() {
        // The timestamp suffix itself can collide when two uploads of the
        // same name land within one second, so the candidate is re-checked
        // and a counter is appended before anything is written.
        let suffixed = collision_name(file_name, &archive_timestamp());
        target = unique_destination(&dir, &suffixed);
        tracing::info!(
            tenant = %tenant,
            category = %category,
            "Pending file {} already exists, storing as {}",
            file_name,
            target.file_name().unwrap_or_default().to_string_lossy()
        );
    }

    std::fs::write(&target, bytes)?;
    Ok(target)
}

/// Insert a timestamp suffix before the extension
fn collision_name(file_name: &str, timestamp: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, timestamp, ext),
        None => format!("{}_{}", file_name, timestamp),
    }
}
