//! Repository for the `scan_results` table.

use guardian_core::types::DbId;
use sqlx::PgPool;

use crate::models::scan_result::{CreateScanResult, ScanResult};

/// Column list for scan_results queries.
pub(crate) const COLUMNS: &str = "id, scan_request_id, result, score, detection_type, platform, \
    source_url, multiple_sources, image_urls, created_at, updated_at";

/// Provides insert and read operations for scan results.
pub struct ScanResultRepo;

impl ScanResultRepo {
    /// Insert findings exactly as given, returning the created row.
    ///
    /// Array order is preserved; empty arrays are stored as `{}`.
    pub async fn create(pool: &PgPool, input: &CreateScanResult) -> Result<ScanResult, sqlx::Error> {
        let query = format!(
            "INSERT INTO scan_results
                (scan_request_id, result, score, detection_type, platform,
                 source_url, multiple_sources, image_urls)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScanResult>(&query)
            .bind(input.scan_request_id)
            .bind(&input.result)
            .bind(&input.score)
            .bind(&input.detection_type)
            .bind(&input.platform)
            .bind(&input.source_url)
            .bind(&input.multiple_sources)
            .bind(&input.image_urls)
            .fetch_one(pool)
            .await
    }

    /// Find a scan result by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ScanResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scan_results WHERE id = $1");
        sqlx::query_as::<_, ScanResult>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All results recorded against a scan request, oldest first.
    pub async fn list_for_request(
        pool: &PgPool,
        scan_request_id: DbId,
    ) -> Result<Vec<ScanResult>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scan_results
             WHERE scan_request_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ScanResult>(&query)
            .bind(scan_request_id)
            .fetch_all(pool)
            .await
    }
}
