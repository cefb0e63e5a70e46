//! Handlers for the `/takedown-requests` resource.
//!
//! Operators may move a takedown to any status; there is no transition table.
//! DMCA filing is simulated: a reference is recorded locally and no request
//! leaves the service.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use guardian_core::dmca::{
    extract_placeholders, render, render_template, RenderedNotice, GENERIC_NOTICE_TEMPLATE,
    OWNER_NAME_FALLBACK, TOKEN_CONTENT_URL, TOKEN_PLATFORM, TOKEN_USER_NAME,
};
use guardian_core::error::CoreError;
use guardian_core::platform::Platform;
use guardian_core::scan_request::normalize_notes;
use guardian_core::takedown::{
    dmca_reference, filing_notice, status_change_notice, validate_new_takedown, TakedownStatus,
};
use guardian_core::types::DbId;
use guardian_db::models::takedown::{CreateTakedownRequest, TakedownRequest};
use guardian_db::repositories::{ScanResultRepo, TakedownRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::users::{ensure_user_exists, quota_outcome};
use crate::query::PlatformFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /takedown-requests`.
#[derive(Debug, Deserialize)]
pub struct CreateTakedownBody {
    pub user_id: DbId,
    pub scan_result_id: Option<DbId>,
    pub url: String,
    pub platform: String,
    pub violation: String,
    pub evidence: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<DbId>,
}

/// Request body for `PATCH /takedown-requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateTakedownStatusBody {
    pub status: String,
}

/// Request body for `POST /takedown-requests/{id}/dmca-draft`.
#[derive(Debug, Default, Deserialize)]
pub struct DraftNoticeBody {
    /// Extra placeholder values. These override the ones derived from the
    /// takedown row.
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// Request body for `POST /takedown-requests/{id}/dmca-filing`.
#[derive(Debug, Default, Deserialize)]
pub struct FileNoticeBody {
    pub notice: Option<String>,
}

/// A takedown after an operator action, with the confirmation to display.
#[derive(Debug, Serialize)]
pub struct TakedownNotice {
    pub takedown: TakedownRequest,
    pub message: String,
}

/// A notice draft for a takedown.
#[derive(Debug, Serialize)]
pub struct NoticeDraft {
    /// Template used, or `None` when the generic notice was rendered.
    pub template_id: Option<String>,
    #[serde(flatten)]
    pub notice: RenderedNotice,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/takedown-requests?platform=YouTube
///
/// Newest first. `platform=All` (or no parameter) lists every platform.
pub async fn list_takedowns(
    State(state): State<AppState>,
    Query(params): Query<PlatformFilterParams>,
) -> AppResult<Json<DataResponse<Vec<TakedownRequest>>>> {
    let takedowns = TakedownRepo::list(&state.pool, params.platform()).await?;
    Ok(Json(DataResponse { data: takedowns }))
}

/// POST /api/v1/takedown-requests
///
/// Open a takedown for a user, optionally linked to a scan result. The
/// owner's email is copied onto the row and the plan's takedown limit applies.
pub async fn create_takedown(
    State(state): State<AppState>,
    Json(input): Json<CreateTakedownBody>,
) -> AppResult<(StatusCode, Json<DataResponse<TakedownRequest>>)> {
    validate_new_takedown(&input.url, &input.violation)?;
    let platform: Platform = input.platform.parse()?;

    let user = ensure_user_exists(&state, input.user_id).await?;
    if let Some(result_id) = input.scan_result_id {
        ScanResultRepo::find_by_id(&state.pool, result_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "ScanResult",
                id: result_id,
            }))?;
    }

    let dto = CreateTakedownRequest {
        user_id: user.id,
        scan_result_id: input.scan_result_id,
        url: input.url.trim().to_string(),
        notes: normalize_notes(input.notes),
        user_email: user.email,
        platform: platform.as_str().to_string(),
        violation: input.violation.trim().to_string(),
        evidence: normalize_notes(input.evidence),
        approved_by: input.approved_by,
    };

    let outcome = TakedownRepo::create_within_plan(&state.pool, &dto).await?;
    let takedown = quota_outcome(outcome, "takedowns", dto.user_id)?;

    tracing::info!(
        takedown_id = takedown.id,
        user_id = takedown.user_id,
        platform = %takedown.platform,
        "Takedown request created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: takedown })))
}

/// GET /api/v1/takedown-requests/{id}
pub async fn get_takedown(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TakedownRequest>>> {
    let takedown = ensure_takedown_exists(&state, id).await?;
    Ok(Json(DataResponse { data: takedown }))
}

/// PATCH /api/v1/takedown-requests/{id}/status
///
/// Set any status. Accepts stored values (`in-process`) or labels
/// (`In Process`).
pub async fn update_takedown_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTakedownStatusBody>,
) -> AppResult<Json<DataResponse<TakedownNotice>>> {
    let status: TakedownStatus = input.status.parse()?;

    let takedown =
        TakedownRepo::update_status(&state.pool, id, status.as_str(), status.is_completed())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "TakedownRequest",
                id,
            }))?;

    tracing::info!(takedown_id = id, status = status.as_str(), "Takedown status updated");

    Ok(Json(DataResponse {
        data: TakedownNotice {
            takedown,
            message: status_change_notice(status),
        },
    }))
}

/// POST /api/v1/takedown-requests/{id}/dmca-draft
///
/// Render the DMCA template for the takedown's platform, or the generic
/// notice when no template covers it.
pub async fn draft_dmca_notice(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<DraftNoticeBody>>,
) -> AppResult<Json<DataResponse<NoticeDraft>>> {
    let input = body.map(|Json(body)| body).unwrap_or_default();
    let takedown = ensure_takedown_exists(&state, id).await?;

    let mut values = HashMap::from([
        (TOKEN_USER_NAME.to_string(), OWNER_NAME_FALLBACK.to_string()),
        (TOKEN_CONTENT_URL.to_string(), takedown.url.clone()),
        (TOKEN_PLATFORM.to_string(), takedown.platform.clone()),
    ]);
    values.extend(input.values);

    let templates = state.templates.read().await;
    let draft = match templates.find_for_platform(&takedown.platform) {
        Some(template) => NoticeDraft {
            template_id: Some(template.id.clone()),
            notice: render_template(template, &values),
        },
        None => NoticeDraft {
            template_id: None,
            notice: generic_notice(&takedown.platform, &values),
        },
    };

    Ok(Json(DataResponse { data: draft }))
}

/// POST /api/v1/takedown-requests/{id}/dmca-filing
///
/// Record a DMCA filing for the takedown. Nothing is sent to the platform.
pub async fn file_dmca_notice(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<FileNoticeBody>>,
) -> AppResult<Json<DataResponse<TakedownNotice>>> {
    let input = body.map(|Json(body)| body).unwrap_or_default();
    let reference = dmca_reference(id, Utc::now());

    let takedown = TakedownRepo::record_dmca_filing(&state.pool, id, &reference)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TakedownRequest",
            id,
        }))?;

    tracing::info!(
        takedown_id = id,
        platform = %takedown.platform,
        dmca_reference = %reference,
        notice_len = input.notice.as_deref().map_or(0, str::len),
        "DMCA notice filed"
    );

    let message = filing_notice(&takedown.platform);
    Ok(Json(DataResponse {
        data: TakedownNotice { takedown, message },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_takedown_exists(state: &AppState, id: DbId) -> AppResult<TakedownRequest> {
    TakedownRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TakedownRequest",
            id,
        }))
}

fn generic_notice(platform: &str, values: &HashMap<String, String>) -> RenderedNotice {
    let body = render(GENERIC_NOTICE_TEMPLATE, values);
    let unresolved = extract_placeholders(&body);
    RenderedNotice {
        subject: format!("DMCA Takedown Notice - {platform}"),
        body,
        unresolved,
    }
}
