//! Scan request models and DTOs.

use guardian_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scan_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
    pub content_type: String,
    pub description: Option<String>,
    pub platforms: Vec<String>,
    pub purposes: Vec<String>,
    pub priority: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A pending request joined with its owner's email and plan.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingScanRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub url: String,
    pub content_type: String,
    pub description: Option<String>,
    pub platforms: Vec<String>,
    pub purposes: Vec<String>,
    pub priority: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_email: String,
    pub plan: String,
}

/// DTO for inserting a new scan request. Values are already validated and
/// canonicalized by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScanRequest {
    pub user_id: DbId,
    pub url: String,
    pub content_type: String,
    pub description: Option<String>,
    pub platforms: Vec<String>,
    pub purposes: Vec<String>,
    pub priority: String,
}

/// Outcome of a transactional approval: the decided request and the
/// findings persisted with it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanApproval {
    pub request: ScanRequest,
    pub result: crate::models::scan_result::ScanResult,
}
