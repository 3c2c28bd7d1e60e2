//! HTTP client for the domain import services
//!
//! Production implementation of `SpreadsheetImporter`: uploads the
//! spreadsheet to the configured import endpoint as a multipart POST and
//! maps the JSON response back onto `ImportSummary`.

use crate::models::{ImportSummary, RowError};
use crate::services::importer::SpreadsheetImporter;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("filedrop-ingest/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Import client errors
#[derive(Debug, Error)]
pub enum ImportClientError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Import service returned a non-success status
    #[error("Import service error {0}: {1}")]
    Service(u16, String),

    /// Failed to parse the import service response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Spreadsheet could not be read from disk
    #[error("File read error: {0}")]
    FileRead(String),
}

/// Import service JSON response
#[derive(Debug, Deserialize)]
struct ImportResponse {
    created: u64,
    updated: u64,
    #[serde(default)]
    errors: Vec<ImportResponseError>,
}

#[derive(Debug, Deserialize)]
struct ImportResponseError {
    row: u32,
    column: String,
    message: String,
}

/// HTTP-backed import collaborator for one category
pub struct HttpImporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpImporter {
    /// Create a client for one import endpoint
    pub fn new(endpoint: String) -> Result<Self, ImportClientError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ImportClientError::Network(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    async fn post_file(
        &self,
        company_code: &str,
        file: &Path,
        overwrite: bool,
        actor: &str,
    ) -> Result<ImportSummary, ImportClientError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| ImportClientError::FileRead(format!("{}: {}", file.display(), e)))?;

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.xlsx".to_string());

        let form = reqwest::multipart::Form::new()
            .text("company_code", company_code.to_string())
            .text("overwrite", overwrite.to_string())
            .text("actor", actor.to_string())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImportClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportClientError::Service(status.as_u16(), body));
        }

        let parsed: ImportResponse = response
            .json()
            .await
            .map_err(|e| ImportClientError::Parse(e.to_string()))?;

        Ok(ImportSummary {
            created: parsed.created,
            updated: parsed.updated,
            errors: parsed
                .errors
                .into_iter()
                .map(|e| RowError {
                    row: e.row,
                    column: e.column,
                    message: e.message,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl SpreadsheetImporter for HttpImporter {
    async fn import(
        &self,
        company_code: &str,
        file: &Path,
        overwrite: bool,
        actor: &str,
    ) -> anyhow::Result<ImportSummary> {
        let summary = self.post_file(company_code, file, overwrite, actor).await?;
        Ok(summary)
    }
}
