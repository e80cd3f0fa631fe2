//! Downloadable report export with a content digest.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::ReportDocument;
use crate::models::Report;

/// Suggested file name for the JSON export.
pub const EXPORT_JSON_FILE_NAME: &str = "report.json";
/// Suggested file name for the text export.
pub const EXPORT_TEXT_FILE_NAME: &str = "report.txt";

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportMetadata {
    /// Export format version
    pub format_version: String,
    /// Unique id of this export
    pub report_id: String,
    /// Export timestamp
    pub exported_at: String,
    /// Exporting system identifier
    pub system_id: Option<String>,
    /// Hash algorithm used for `content_hash`
    pub hash_algorithm: String,
    /// Hex digest of the canonical report JSON
    pub content_hash: String,
}

/// A report ready for download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportExport {
    pub metadata: ExportMetadata,
    pub report: Report,
    pub document: ReportDocument,
}

/// Compute SHA-256 hash of data.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Serialize a report to canonical JSON for hashing.
pub fn canonical_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

impl ReportExport {
    /// Wrap a report for export.
    pub fn new(report: Report, system_id: Option<String>) -> Result<Self, serde_json::Error> {
        let content_hash = hash_data(canonical_json(&report)?.as_bytes());
        let document = ReportDocument::from_report(&report);
        Ok(Self {
            metadata: ExportMetadata {
                format_version: "1.0".to_string(),
                report_id: uuid::Uuid::new_v4().to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                system_id,
                hash_algorithm: "SHA-256".to_string(),
                content_hash,
            },
            report,
            document,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse an export back from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Export the document as plain text.
    pub fn to_text(&self) -> String {
        self.document.to_text()
    }

    /// Write [`EXPORT_JSON_FILE_NAME`] and [`EXPORT_TEXT_FILE_NAME`] into `dir`,
    /// creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(EXPORT_JSON_FILE_NAME), self.to_json()?)?;
        std::fs::write(dir.join(EXPORT_TEXT_FILE_NAME), self.to_text())
    }

    /// Check that the report still matches its recorded digest.
    pub fn verify(&self) -> Result<bool, serde_json::Error> {
        Ok(hash_data(canonical_json(&self.report)?.as_bytes()) == self.metadata.content_hash)
    }
}
