//! Collision-safe archival of processed files
//!
//! Every processed file is moved out of its drop folder into the shared
//! success or failed area under a traceable name:
//!
//! ```text
//! <tenant>_<category>_<yyyyMMdd_HHmmss>_<originalName>
//! ```
//!
//! Failures additionally get an error sidecar
//! (`<tenant>_<category>_<timestamp>_error.txt`) beside the archived file.

use crate::models::ImportCategory;
use crate::services::folder_lifecycle::{failed_dir, success_dir};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Timestamp format embedded in archive names (second resolution)
const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current archive timestamp, local time
pub fn archive_timestamp() -> String {
    Local::now().format(ARCHIVE_TIMESTAMP_FORMAT).to_string()
}

/// Archive name for a processed file
pub fn archive_file_name(
    tenant: &str,
    category: ImportCategory,
    timestamp: &str,
    original_name: &str,
) -> String {
    format!(
        "{}_{}_{}_{}",
        tenant,
        category.folder_name(),
        timestamp,
        original_name
    )
}

/// Sidecar name matching an archived failing file
fn sidecar_file_name(tenant: &str, category: ImportCategory, timestamp: &str) -> String {
    format!("{}_{}_{}_error.txt", tenant, category.folder_name(), timestamp)
}

/// Move a successfully imported file into `<base>/sukses/`
///
/// Move errors are logged and swallowed: the source file may remain in
/// place in that narrow case, which is an accepted limitation of the
/// drop-folder model. Returns the destination when the move happened.
pub fn archive_success(
    base: &Path,
    file: &Path,
    tenant: &str,
    category: ImportCategory,
) -> Option<PathBuf> {
    let timestamp = archive_timestamp();
    match archive_to(&success_dir(base), file, tenant, category, &timestamp) {
        Ok(dest) => {
            tracing::info!(
                tenant = %tenant,
                category = %category,
                "Archived to success area: {}",
                dest.display()
            );
            Some(dest)
        }
        Err(e) => {
            tracing::warn!(
                tenant = %tenant,
                category = %category,
                "Failed to archive {} to success area: {}",
                file.display(),
                e
            );
            None
        }
    }
}

/// Move a failing file into `<base>/failed/` and write its error sidecar
pub fn archive_failure(
    base: &Path,
    file: &Path,
    tenant: &str,
    category: ImportCategory,
    error_detail: &str,
) -> Option<PathBuf> {
    let timestamp = archive_timestamp();
    let dir = failed_dir(base);

    let dest = match archive_to(&dir, file, tenant, category, &timestamp) {
        Ok(dest) => {
            tracing::info!(
                tenant = %tenant,
                category = %category,
                "Archived to failed area: {}",
                dest.display()
            );
            Some(dest)
        }
        Err(e) => {
            tracing::warn!(
                tenant = %tenant,
                category = %category,
                "Failed to archive {} to failed area: {}",
                file.display(),
                e
            );
            None
        }
    };

    let original_name = original_name_of(file);
    let sidecar = dir.join(sidecar_file_name(tenant, category, &timestamp));
    let content = format!(
        "Tenant: {}\nCategory: {}\nFile: {}\nTimestamp: {}\nError: {}\n",
        tenant,
        category.folder_name(),
        original_name,
        timestamp,
        error_detail
    );
    if let Err(e) = std::fs::write(&sidecar, content) {
        tracing::warn!("Failed to write error sidecar {}: {}", sidecar.display(), e);
    }

    dest
}

fn original_name_of(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn archive_to(
    dir: &Path,
    file: &Path,
    tenant: &str,
    category: ImportCategory,
    timestamp: &str,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let name = archive_file_name(tenant, category, timestamp, &original_name_of(file));
    let dest = unique_destination(dir, &name);
    move_file(file, &dest)?;
    Ok(dest)
}

/// Pick a destination that does not clobber an existing archive
///
/// The timestamped name is already unique unless the same file name is
/// processed twice within one second; in that race a `_1`, `_2`… counter
/// is inserted before the extension instead of overwriting.
pub(crate) fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), Some(ext.to_string())),
        None => (name.to_string(), None),
    };

    for n in 1u32.. {
        let next = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, n, ext),
            None => format!("{}_{}", stem, n),
        };
        let candidate = dir.join(next);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("counter space exhausted");
}

/// Move a file, falling back to copy+delete when rename fails
/// (e.g. across filesystems)
fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                "Rename {} -> {} failed ({}), falling back to copy+delete",
                src.display(),
                dest.display(),
                rename_err
            );
            std::fs::copy(src, dest)?;
            std::fs::remove_file(src)?;
            Ok(())
        }
    }
}
