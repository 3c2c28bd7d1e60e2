//! Pending spreadsheet discovery
//!
//! Lists regular files with a spreadsheet extension directly inside one
//! tenant/category folder. No recursion: subdirectories inside a drop
//! folder are not part of the contract and are ignored.

use crate::models::{ImportCategory, PendingFile};
use crate::services::folder_lifecycle::category_dir;
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// Extensions accepted as pending spreadsheets (lower-cased comparison)
const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Check whether a file name carries a spreadsheet extension
pub fn is_spreadsheet_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    SPREADSHEET_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// List pending spreadsheets in `<base>/<tenant>/<category>/`
///
/// A missing folder yields an empty list (folders are lazily created by
/// the folder lifecycle in the normal flow, but scanning tolerates
/// absence). Unreadable entries are logged and skipped. The result is
/// sorted by file name for deterministic processing order.
pub fn list_pending_files(base: &Path, tenant: &str, category: ImportCategory) -> Vec<PendingFile> {
    let dir = category_dir(base, tenant, category);
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error accessing entry under {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_spreadsheet_name(&file_name) {
            continue;
        }

        let (size, modified) = match entry.metadata() {
            Ok(meta) => {
                let modified = meta
                    .modified()
                    .ok()
                    .map(|t| DateTime::<Utc>::from(t));
                (meta.len(), modified)
            }
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", entry.path().display(), e);
                (0, None)
            }
        };

        files.push(PendingFile {
            path: entry.path().to_path_buf(),
            file_name,
            size,
            modified,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    files
}
