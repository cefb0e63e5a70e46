//! Repository for the `scan_requests` table and the approval workflow.

use guardian_core::plan::reached_limit;
use guardian_core::scan_request::{STATUS_APPROVED, STATUS_PENDING};
use guardian_core::types::DbId;
use sqlx::PgPool;

use crate::models::scan_request::{
    CreateScanRequest, PendingScanRequest, ScanApproval, ScanRequest,
};
use crate::models::quota::QuotaInsert;
use crate::models::scan_result::{CreateScanResult, ScanResult};
use crate::repositories::scan_result_repo::COLUMNS as RESULT_COLUMNS;
use crate::repositories::UserRepo;

/// Column list for scan_requests queries.
const COLUMNS: &str = "id, user_id, url, content_type, description, platforms, purposes, \
    priority, status, notes, created_at, updated_at";

/// Provides CRUD operations and status transitions for scan requests.
pub struct ScanRequestRepo;

impl ScanRequestRepo {
    /// Insert a new scan request. Status defaults to `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateScanRequest,
    ) -> Result<ScanRequest, sqlx::Error> {
        let query = insert_query();
        sqlx::query_as::<_, ScanRequest>(&query)
            .bind(input.user_id)
            .bind(&input.url)
            .bind(&input.content_type)
            .bind(&input.description)
            .bind(&input.platforms)
            .bind(&input.purposes)
            .bind(&input.priority)
            .fetch_one(pool)
            .await
    }

    /// Insert a new scan request if the owner's plan still allows one.
    ///
    /// The owner row is locked, counted against and inserted under in one
    /// transaction. Nothing is written unless the result is `Created`.
    pub async fn create_within_plan(
        pool: &PgPool,
        input: &CreateScanRequest,
    ) -> Result<QuotaInsert<ScanRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(plan) = UserRepo::lock_plan(&mut *tx, input.user_id).await? else {
            tx.rollback().await?;
            return Ok(QuotaInsert::OwnerNotFound);
        };

        let (used,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM scan_requests WHERE user_id = $1")
                .bind(input.user_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(limit) = reached_limit(plan.limits().scans, used) {
            tx.rollback().await?;
            return Ok(QuotaInsert::LimitReached { used, limit });
        }

        let query = insert_query();
        let request = sqlx::query_as::<_, ScanRequest>(&query)
            .bind(input.user_id)
            .bind(&input.url)
            .bind(&input.content_type)
            .bind(&input.description)
            .bind(&input.platforms)
            .bind(&input.purposes)
            .bind(&input.priority)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(QuotaInsert::Created(request))
    }

    /// Find a scan request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScanRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scan_requests WHERE id = $1");
        sqlx::query_as::<_, ScanRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All pending requests joined with the owner's email and plan, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<PendingScanRequest>, sqlx::Error> {
        sqlx::query_as::<_, PendingScanRequest>(
            "SELECT
                sr.id, sr.user_id, sr.url, sr.content_type, sr.description,
                sr.platforms, sr.purposes, sr.priority, sr.status,
                sr.created_at, sr.updated_at,
                u.email AS user_email,
                u.plan
             FROM scan_requests sr
             INNER JOIN users u ON u.id = sr.user_id
             WHERE sr.status = $1
             ORDER BY sr.id ASC",
        )
        .bind(STATUS_PENDING)
        .fetch_all(pool)
        .await
    }

    /// All requests owned by a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ScanRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scan_requests
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ScanRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Number of requests a user has submitted, any status.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scan_requests WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Move a pending request to `status`, replacing its notes.
    ///
    /// Only rows still `pending` are touched, so a decided request is never
    /// decided again. Returns `None` when the id is unknown or the request
    /// was already decided.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Option<ScanRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE scan_requests SET status = $2, notes = $3
             WHERE id = $1 AND status = '{STATUS_PENDING}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScanRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Approve a pending request and persist its findings in one transaction.
    ///
    /// The status update runs first so the row lock it takes serializes
    /// concurrent reviewers. `findings.scan_request_id` is ignored in favour
    /// of `id`. Returns `None` (and writes nothing) when the id is unknown or
    /// the request was already decided.
    pub async fn approve_with_result(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
        findings: &CreateScanResult,
    ) -> Result<Option<ScanApproval>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE scan_requests SET status = $2, notes = $3
             WHERE id = $1 AND status = '{STATUS_PENDING}'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, ScanRequest>(&update)
            .bind(id)
            .bind(STATUS_APPROVED)
            .bind(notes)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            tracing::debug!(
                scan_request_id = id,
                "Approval skipped: request missing or decided"
            );
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO scan_results
                (scan_request_id, result, score, detection_type, platform,
                 source_url, multiple_sources, image_urls)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {RESULT_COLUMNS}"
        );
        let result = sqlx::query_as::<_, ScanResult>(&insert)
            .bind(id)
            .bind(&findings.result)
            .bind(&findings.score)
            .bind(&findings.detection_type)
            .bind(&findings.platform)
            .bind(&findings.source_url)
            .bind(&findings.multiple_sources)
            .bind(&findings.image_urls)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ScanApproval { request, result }))
    }
}

fn insert_query() -> String {
    format!(
        "INSERT INTO scan_requests
            (user_id, url, content_type, description, platforms, purposes, priority)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    )
}
