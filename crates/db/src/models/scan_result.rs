//! Scan result model and DTO.

use guardian_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scan_results` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanResult {
    pub id: DbId,
    pub scan_request_id: DbId,
    pub result: String,
    pub score: Option<String>,
    pub detection_type: Option<String>,
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub multiple_sources: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting findings against a scan request.
///
/// Stored as given: no field is validated here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScanResult {
    pub scan_request_id: DbId,
    pub result: String,
    pub score: Option<String>,
    pub detection_type: Option<String>,
    pub platform: Option<String>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub multiple_sources: Vec<String>,
    #[serde(default, alias = "image_url")]
    pub image_urls: Vec<String>,
}
