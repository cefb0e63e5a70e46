//! Aggregate queries backing the admin dashboard.

use guardian_core::scan_request::STATUS_PENDING;
use guardian_core::takedown::{
    TAKEDOWN_FAILED, TAKEDOWN_IN_PROCESS, TAKEDOWN_PENDING, TAKEDOWN_SUCCESS,
};
use sqlx::PgPool;

use crate::models::dashboard::DashboardCounts;

pub struct DashboardRepo;

impl DashboardRepo {
    /// All dashboard counts in a single round trip.
    pub async fn counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM scan_requests WHERE status = $1) AS pending_scans,
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM takedown_requests) AS takedowns_total,
                (SELECT COUNT(*) FROM takedown_requests WHERE status = $2) AS takedowns_pending,
                (SELECT COUNT(*) FROM takedown_requests WHERE status = $3) AS takedowns_in_process,
                (SELECT COUNT(*) FROM takedown_requests WHERE status = $4) AS takedowns_success,
                (SELECT COUNT(*) FROM takedown_requests WHERE status = $5) AS takedowns_failed",
        )
        .bind(STATUS_PENDING)
        .bind(TAKEDOWN_PENDING)
        .bind(TAKEDOWN_IN_PROCESS)
        .bind(TAKEDOWN_SUCCESS)
        .bind(TAKEDOWN_FAILED)
        .fetch_one(pool)
        .await
    }
}
