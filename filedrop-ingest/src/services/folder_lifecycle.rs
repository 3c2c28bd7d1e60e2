//! Drop-folder layout and lifecycle
//!
//! Well-known tree under the base folder (names are fixed for
//! compatibility with the systems dropping and collecting files):
//!
//! ```text
//! <base>/<tenant>/AgencyList/   pending agency spreadsheets
//! <base>/<tenant>/PolicyList/   pending policy spreadsheets
//! <base>/sukses/                archived successful imports
//! <base>/failed/                archived failing imports + error sidecars
//! ```

use crate::models::ImportCategory;
use std::path::{Path, PathBuf};

/// Shared archive folder for successfully imported files
pub const SUCCESS_FOLDER: &str = "sukses";

/// Shared archive folder for failing files and their error sidecars
pub const FAILED_FOLDER: &str = "failed";

/// `<base>/<tenant>/`
pub fn tenant_dir(base: &Path, tenant: &str) -> PathBuf {
    base.join(tenant)
}

/// `<base>/<tenant>/<category>/`
pub fn category_dir(base: &Path, tenant: &str, category: ImportCategory) -> PathBuf {
    base.join(tenant).join(category.folder_name())
}

/// `<base>/sukses/`
pub fn success_dir(base: &Path) -> PathBuf {
    base.join(SUCCESS_FOLDER)
}

/// `<base>/failed/`
pub fn failed_dir(base: &Path) -> PathBuf {
    base.join(FAILED_FOLDER)
}

/// Ensure both category folders exist for a tenant
///
/// Recursive and idempotent: creating an already-existing directory is a
/// no-op. Creation errors are logged and swallowed; the affected category
/// is simply skipped this pass (its scan finds no folder and yields
/// nothing).
pub fn ensure_folders(base: &Path, tenant: &str) {
    for category in ImportCategory::ALL {
        let dir = category_dir(base, tenant, category);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(
                tenant = %tenant,
                category = %category,
                path = %dir.display(),
                "Failed to create drop folder, skipping this pass: {}",
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_both_category_folders() {
        let base = TempDir::new().unwrap();
        ensure_folders(base.path(), "ACME");

        assert!(base.path().join("ACME/AgencyList").is_dir());
        assert!(base.path().join("ACME/PolicyList").is_dir());
    }

    #[test]
    fn ensure_is_idempotent() {
        let base = TempDir::new().unwrap();
        ensure_folders(base.path(), "ACME");

        // Drop a file in, then ensure again: tree unchanged beyond existence
        let marker = base.path().join("ACME/AgencyList/list.xlsx");
        std::fs::write(&marker, b"x").unwrap();
        ensure_folders(base.path(), "ACME");

        assert!(marker.exists());
        assert!(base.path().join("ACME/PolicyList").is_dir());
    }
}
