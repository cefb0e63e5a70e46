//! Takedown request model and DTOs.

use guardian_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `takedown_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TakedownRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub scan_result_id: Option<DbId>,
    pub url: String,
    pub status: String,
    pub notes: Option<String>,
    pub user_email: String,
    pub platform: String,
    pub violation: String,
    pub evidence: Option<String>,
    pub approved_by: Option<DbId>,
    pub dmca_reference: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a takedown request. `user_email` is copied from the
/// owning user row by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTakedownRequest {
    pub user_id: DbId,
    pub scan_result_id: Option<DbId>,
    pub url: String,
    pub notes: Option<String>,
    pub user_email: String,
    pub platform: String,
    pub violation: String,
    pub evidence: Option<String>,
    pub approved_by: Option<DbId>,
}
