//! Handlers for the scan request approval workflow.
//!
//! Reviewers see pending requests, then approve (with findings) or reject
//! each one exactly once. Decisions only apply to rows still `pending`, so a
//! second reviewer racing the first gets 409 instead of overwriting.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardian_core::error::CoreError;
use guardian_core::platform::{parse_platforms, platform_names};
use guardian_core::scan_request::{
    clean_purposes, normalize_notes, validate_new_request, validate_result_text, Priority,
    ReviewAction, ScanStatus,
};
use guardian_core::types::DbId;
use guardian_db::models::scan_request::{
    CreateScanRequest, PendingScanRequest, ScanApproval, ScanRequest,
};
use guardian_db::models::scan_result::{CreateScanResult, ScanResult};
use guardian_db::repositories::{ScanRequestRepo, ScanResultRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, StoreResultExt};
use crate::handlers::users::quota_outcome;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /scan-requests`.
#[derive(Debug, Deserialize)]
pub struct CreateScanRequestBody {
    pub user_id: DbId,
    pub url: String,
    pub content_type: String,
    pub description: Option<String>,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub purposes: Vec<String>,
    pub priority: Option<String>,
}

/// Request body for `PATCH /scan-requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub action: ReviewAction,
    pub notes: Option<String>,
}

/// Request body for `POST /scan-requests/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub notes: Option<String>,
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

/// Request body for `POST /scan-requests/{id}/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    pub notes: Option<String>,
}

/// Acknowledgement returned after a status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub success: bool,
    pub scan_request: ScanRequest,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/scan-requests/pending
///
/// All pending requests with the owner's email and plan, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingScanRequest>>>> {
    let pending = ScanRequestRepo::list_pending(&state.pool)
        .await
        .or_store_error("Failed to fetch scan requests")?;

    Ok(Json(DataResponse { data: pending }))
}

/// POST /api/v1/scan-requests
///
/// Submit a new request for review. The owner's plan caps how many requests
/// they may submit in total.
pub async fn create_scan_request(
    State(state): State<AppState>,
    Json(input): Json<CreateScanRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<ScanRequest>>)> {
    validate_new_request(&input.url, &input.content_type)?;
    let platforms = parse_platforms(&input.platforms)?;
    let priority = match input.priority.as_deref() {
        Some(raw) => raw.parse::<Priority>()?,
        None => Priority::Medium,
    };

    let dto = CreateScanRequest {
        user_id: input.user_id,
        url: input.url.trim().to_string(),
        content_type: input.content_type.trim().to_string(),
        description: normalize_notes(input.description),
        platforms: platform_names(&platforms),
        purposes: clean_purposes(&input.purposes),
        priority: priority.as_str().to_string(),
    };

    let outcome = ScanRequestRepo::create_within_plan(&state.pool, &dto).await?;
    let request = quota_outcome(outcome, "scans", dto.user_id)?;

    tracing::info!(
        scan_request_id = request.id,
        user_id = request.user_id,
        priority = %request.priority,
        "Scan request submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/scan-requests/{id}
pub async fn get_scan_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ScanRequest>>> {
    let request = ensure_scan_request_exists(&state, id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// PATCH /api/v1/scan-requests/{id}/status
///
/// Record a reviewer decision. Blank notes are stored as NULL.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusBody>,
) -> AppResult<Json<DataResponse<StatusUpdated>>> {
    let target = input.action.target_status();
    let notes = normalize_notes(input.notes);

    let request = decide(&state, id, target, notes.as_deref()).await?;

    tracing::info!(
        scan_request_id = id,
        action = input.action.as_str(),
        status = target.as_str(),
        "Scan request decided"
    );

    Ok(Json(DataResponse {
        data: StatusUpdated {
            success: true,
            scan_request: request,
        },
    }))
}

/// POST /api/v1/scan-requests/{id}/approve
///
/// Approve a pending request and store its findings in one transaction.
/// The findings are validated before anything is written.
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveBody>,
) -> AppResult<Json<DataResponse<ScanApproval>>> {
    validate_result_text(&input.result)?;
    let notes = normalize_notes(input.notes);

    let findings = CreateScanResult {
        scan_request_id: id,
        result: input.result,
        score: input.score,
        detection_type: input.detection_type,
        platform: input.platform,
        source_url: input.source_url,
        multiple_sources: input.multiple_sources,
        image_urls: input.image_urls,
    };

    let approval =
        match ScanRequestRepo::approve_with_result(&state.pool, id, notes.as_deref(), &findings)
            .await
            .or_store_error("Failed to update scan request")?
        {
            Some(approval) => approval,
            None => return Err(undecidable(&state, id).await),
        };

    tracing::info!(
        scan_request_id = id,
        scan_result_id = approval.result.id,
        action = ReviewAction::Approve.as_str(),
        status = ScanStatus::Approved.as_str(),
        "Scan request approved with findings"
    );

    Ok(Json(DataResponse { data: approval }))
}

/// POST /api/v1/scan-requests/{id}/reject
///
/// Reject a pending request. No scan result is written.
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<RejectBody>>,
) -> AppResult<Json<DataResponse<ScanRequest>>> {
    let input = body.map(|Json(body)| body).unwrap_or_default();
    let notes = normalize_notes(input.notes);
    let request = decide(&state, id, ScanStatus::Rejected, notes.as_deref()).await?;

    tracing::info!(
        scan_request_id = id,
        action = ReviewAction::Reject.as_str(),
        status = ScanStatus::Rejected.as_str(),
        "Scan request rejected"
    );

    Ok(Json(DataResponse { data: request }))
}

/// GET /api/v1/scan-requests/{id}/results
pub async fn list_results(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScanResult>>>> {
    ensure_scan_request_exists(&state, id).await?;

    let results = ScanResultRepo::list_for_request(&state.pool, id).await?;
    Ok(Json(DataResponse { data: results }))
}

/// POST /api/v1/scan-results
///
/// Store findings as given. Only the parent request's existence is checked.
pub async fn submit_scan_result(
    State(state): State<AppState>,
    Json(input): Json<CreateScanResult>,
) -> AppResult<(StatusCode, Json<DataResponse<ScanResult>>)> {
    ScanRequestRepo::find_by_id(&state.pool, input.scan_request_id)
        .await
        .or_store_error("Failed to submit scan results")?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ScanRequest",
            id: input.scan_request_id,
        }))?;

    let result = ScanResultRepo::create(&state.pool, &input)
        .await
        .or_store_error("Failed to submit scan results")?;

    tracing::info!(
        scan_request_id = result.scan_request_id,
        scan_result_id = result.id,
        sources = result.multiple_sources.len(),
        images = result.image_urls.len(),
        "Scan results submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a scan request or fail with 404.
async fn ensure_scan_request_exists(state: &AppState, id: DbId) -> AppResult<ScanRequest> {
    ScanRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ScanRequest",
            id,
        }))
}

/// Move a pending request to a terminal status.
async fn decide(
    state: &AppState,
    id: DbId,
    target: ScanStatus,
    notes: Option<&str>,
) -> AppResult<ScanRequest> {
    match ScanRequestRepo::update_status(&state.pool, id, target.as_str(), notes)
        .await
        .or_store_error("Failed to update scan request")?
    {
        Some(request) => Ok(request),
        None => Err(undecidable(state, id).await),
    }
}

/// Explain why a guarded update touched no row: the id is unknown (404) or
/// the request was already decided (409).
async fn undecidable(state: &AppState, id: DbId) -> AppError {
    let existing = match ScanRequestRepo::find_by_id(&state.pool, id)
        .await
        .or_store_error("Failed to update scan request")
    {
        Ok(existing) => existing,
        Err(err) => return err,
    };

    match existing {
        None => AppError::Core(CoreError::NotFound {
            entity: "ScanRequest",
            id,
        }),
        Some(request) => {
            tracing::warn!(
                scan_request_id = id,
                status = %request.status,
                "Decision on an already decided scan request"
            );
            AppError::Core(CoreError::Conflict(format!(
                "Scan request {id} is already {}",
                request.status
            )))
        }
    }
}
