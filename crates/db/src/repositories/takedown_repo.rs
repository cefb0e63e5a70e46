//! Repository for the `takedown_requests` table.

use guardian_core::plan::reached_limit;
use guardian_core::types::DbId;
use sqlx::PgPool;

use crate::models::quota::QuotaInsert;
use crate::models::takedown::{CreateTakedownRequest, TakedownRequest};
use crate::repositories::UserRepo;

/// Column list for takedown_requests queries.
const COLUMNS: &str = "id, user_id, scan_result_id, url, status, notes, user_email, platform, \
    violation, evidence, approved_by, dmca_reference, completed_at, created_at, updated_at";

/// Provides CRUD operations for takedown requests.
pub struct TakedownRepo;

impl TakedownRepo {
    /// Insert a new takedown request. Status defaults to `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTakedownRequest,
    ) -> Result<TakedownRequest, sqlx::Error> {
        let query = insert_query();
        sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(input.user_id)
            .bind(input.scan_result_id)
            .bind(&input.url)
            .bind(&input.notes)
            .bind(&input.user_email)
            .bind(&input.platform)
            .bind(&input.violation)
            .bind(&input.evidence)
            .bind(input.approved_by)
            .fetch_one(pool)
            .await
    }

    /// Insert a takedown if the owner's plan still allows one, holding the
    /// owner row lock across the count and the insert.
    pub async fn create_within_plan(
        pool: &PgPool,
        input: &CreateTakedownRequest,
    ) -> Result<QuotaInsert<TakedownRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(plan) = UserRepo::lock_plan(&mut *tx, input.user_id).await? else {
            tx.rollback().await?;
            return Ok(QuotaInsert::OwnerNotFound);
        };

        let (used,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM takedown_requests WHERE user_id = $1")
                .bind(input.user_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(limit) = reached_limit(plan.limits().takedowns, used) {
            tx.rollback().await?;
            return Ok(QuotaInsert::LimitReached { used, limit });
        }

        let query = insert_query();
        let takedown = sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(input.user_id)
            .bind(input.scan_result_id)
            .bind(&input.url)
            .bind(&input.notes)
            .bind(&input.user_email)
            .bind(&input.platform)
            .bind(&input.violation)
            .bind(&input.evidence)
            .bind(input.approved_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(QuotaInsert::Created(takedown))
    }

    /// Find a takedown request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TakedownRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM takedown_requests WHERE id = $1");
        sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List takedown requests newest first, optionally for one platform
    /// (matched case-insensitively).
    pub async fn list(
        pool: &PgPool,
        platform: Option<&str>,
    ) -> Result<Vec<TakedownRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM takedown_requests
             WHERE ($1::TEXT IS NULL OR LOWER(platform) = LOWER($1))
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(platform)
            .fetch_all(pool)
            .await
    }

    /// Number of takedowns a user has requested, any status.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM takedown_requests WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Set the status of a takedown. `completed_at` is stamped when
    /// `completed` is true (keeping an earlier stamp) and cleared otherwise.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        completed: bool,
    ) -> Result<Option<TakedownRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE takedown_requests SET
                status = $2,
                completed_at = CASE WHEN $3 THEN COALESCE(completed_at, NOW()) ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(completed)
            .fetch_optional(pool)
            .await
    }

    /// Record the local reference of a filed DMCA notice.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn record_dmca_filing(
        pool: &PgPool,
        id: DbId,
        reference: &str,
    ) -> Result<Option<TakedownRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE takedown_requests SET dmca_reference = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TakedownRequest>(&query)
            .bind(id)
            .bind(reference)
            .fetch_optional(pool)
            .await
    }
}

fn insert_query() -> String {
    format!(
        "INSERT INTO takedown_requests
            (user_id, scan_result_id, url, notes, user_email, platform,
             violation, evidence, approved_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {COLUMNS}"
    )
}
