//! Configuration resolution for filedrop-ingest
//!
//! Per-value priority: environment variable → TOML config file → compiled
//! default. The base folder additionally honors a command-line argument
//! (see `filedrop_common::config::resolve_base_folder`).

use filedrop_common::config::{resolve_base_folder, TomlConfig};
use std::path::PathBuf;
use tracing::warn;

/// Default HTTP bind address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";

/// Default fixed delay between scheduled passes, in hours
pub const DEFAULT_INTERVAL_HOURS: u32 = 1;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Filesystem root with the per-tenant drop folders
    pub base_folder: PathBuf,
    /// Whether the scheduled trigger path fires (manual runs are unaffected)
    pub scheduler_enabled: bool,
    /// Fixed delay between scheduled passes, clamped to >= 1 hour
    pub interval_hours: u32,
    /// HTTP bind address
    pub bind_address: String,
    /// Agency-list import collaborator endpoint
    pub agency_import_url: Option<String>,
    /// Policy-list import collaborator endpoint
    pub policy_import_url: Option<String>,
}

impl IngestConfig {
    /// Resolve configuration from CLI argument, environment, and TOML file
    pub fn resolve(cli_base_folder: Option<&str>, toml_config: &TomlConfig) -> Self {
        let base_folder = resolve_base_folder(cli_base_folder, toml_config);

        let scheduler_enabled = env_bool("FILEDROP_SCHEDULER_ENABLED")
            .or(toml_config.scheduler_enabled)
            .unwrap_or(true);

        let interval_hours = env_u32("FILEDROP_INTERVAL_HOURS")
            .or(toml_config.interval_hours)
            .unwrap_or(DEFAULT_INTERVAL_HOURS);
        let interval_hours = if interval_hours == 0 {
            warn!("interval_hours of 0 is invalid, clamping to 1");
            1
        } else {
            interval_hours
        };

        let bind_address = env_string("FILEDROP_BIND_ADDRESS")
            .or_else(|| toml_config.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let agency_import_url = env_string("FILEDROP_AGENCY_IMPORT_URL")
            .or_else(|| toml_config.agency_import_url.clone());
        let policy_import_url = env_string("FILEDROP_POLICY_IMPORT_URL")
            .or_else(|| toml_config.policy_import_url.clone());

        Self {
            base_folder,
            scheduler_enabled,
            interval_hours,
            bind_address,
            agency_import_url,
            policy_import_url,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
    let value = env_string(name)?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring unparseable boolean {}={}", name, other);
            None
        }
    }
}

fn env_u32(name: &str) -> Option<u32> {
    let value = env_string(name)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring unparseable integer {}={}", name, value);
            None
        }
    }
}
