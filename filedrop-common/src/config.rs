//! Configuration loading and base folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file contents (`~/.config/filedrop/config.toml`)
///
/// Every field is optional; missing values fall back to environment
/// variables and then to compiled defaults (see [`resolve_base_folder`]
/// and the per-service config modules).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Filesystem root under which tenant drop folders live
    pub base_folder: Option<String>,
    /// Whether the background scheduler fires at all
    pub scheduler_enabled: Option<bool>,
    /// Fixed delay between scheduled ingestion passes, in hours
    pub interval_hours: Option<u32>,
    /// HTTP bind address for the ingest service
    pub bind_address: Option<String>,
    /// Endpoint of the agency-list import collaborator
    pub agency_import_url: Option<String>,
    /// Endpoint of the policy-list import collaborator
    pub policy_import_url: Option<String>,
}

/// Load TOML configuration from an explicit path
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
}

/// Load TOML configuration from the default platform location
///
/// Returns `TomlConfig::default()` when no config file exists (absence
/// is not an error; everything has a fallback).
pub fn load_default_toml_config() -> TomlConfig {
    let Some(path) = default_config_path() else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }
    match load_toml_config(&path) {
        Ok(config) => {
            tracing::debug!("Loaded config file: {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("filedrop").join("config.toml"))
}

/// Resolve the base folder following priority order:
/// 1. Command-line argument (highest priority)
/// 2. `FILEDROP_BASE_FOLDER` environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_base_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("FILEDROP_BASE_FOLDER") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.base_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    default_base_folder()
}

/// OS-dependent default base folder path
fn default_base_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/filedrop (or /var/lib/filedrop for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("filedrop"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/filedrop"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/filedrop
        dirs::data_dir()
            .map(|d| d.join("filedrop"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/filedrop"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\filedrop
        dirs::data_local_dir()
            .map(|d| d.join("filedrop"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\filedrop"))
    } else {
        PathBuf::from("./filedrop_data")
    }
}

/// Ensure the base folder exists, creating it (recursively) if missing
pub fn ensure_base_folder(base: &Path) -> Result<()> {
    std::fs::create_dir_all(base)?;
    Ok(())
}

/// Database file path inside the base folder
pub fn database_path(base: &Path) -> PathBuf {
    base.join("filedrop.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_arg_wins_over_everything() {
        std::env::set_var("FILEDROP_BASE_FOLDER", "/tmp/from-env");
        let toml = TomlConfig {
            base_folder: Some("/tmp/from-toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_base_folder(Some("/tmp/from-cli"), &toml);
        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
        std::env::remove_var("FILEDROP_BASE_FOLDER");
    }

    #[test]
    #[serial]
    fn env_wins_over_toml() {
        std::env::set_var("FILEDROP_BASE_FOLDER", "/tmp/from-env");
        let toml = TomlConfig {
            base_folder: Some("/tmp/from-toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_base_folder(None, &toml);
        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
        std::env::remove_var("FILEDROP_BASE_FOLDER");
    }

    #[test]
    #[serial]
    fn toml_used_when_no_override() {
        std::env::remove_var("FILEDROP_BASE_FOLDER");
        let toml = TomlConfig {
            base_folder: Some("/tmp/from-toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_base_folder(None, &toml);
        assert_eq!(resolved, PathBuf::from("/tmp/from-toml"));
    }

    #[test]
    fn toml_round_trip() {
        let content = r#"
            base_folder = "/srv/filedrop"
            scheduler_enabled = false
            interval_hours = 6
        "#;
        let config: TomlConfig = toml::from_str(content).unwrap();
        assert_eq!(config.base_folder.as_deref(), Some("/srv/filedrop"));
        assert_eq!(config.scheduler_enabled, Some(false));
        assert_eq!(config.interval_hours, Some(6));
        assert!(config.agency_import_url.is_none());
    }
}
