//! Aggregate counts for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

/// Persisted-entity counts. Template counts live in memory and are added by
/// the API layer.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardCounts {
    pub pending_scans: i64,
    pub total_users: i64,
    pub takedowns_total: i64,
    pub takedowns_pending: i64,
    pub takedowns_in_process: i64,
    pub takedowns_success: i64,
    pub takedowns_failed: i64,
}
