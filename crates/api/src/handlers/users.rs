//! Handlers for the `/users` resource (plan management).
//!
//! The list and plan-update endpoints return bare JSON rather than the
//! `{ "data": ... }` envelope; existing dashboard clients read them that way.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardian_core::error::CoreError;
use guardian_core::plan::{quota_exceeded, Plan};
use guardian_core::types::DbId;
use guardian_db::models::quota::QuotaInsert;
use guardian_db::models::scan_request::ScanRequest;
use guardian_db::models::user::{CreateUser, User};
use guardian_db::repositories::{ScanRequestRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult, StoreResultExt};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    pub avatar: Option<String>,
    pub plan: Option<String>,
}

/// Request body for `PATCH /users/{id}`.
///
/// `plan` is optional at the serde level so a missing field gets the same
/// "plan is required" message as an explicit `null`.
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub plan: Option<String>,
}

/// A user row with the limits of its plan attached. `null` means unlimited.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub scans_limit: Option<i64>,
    pub takedowns_limit: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        // `ck_users_plan` keeps stored plans parseable.
        let limits = user.plan.parse::<Plan>().unwrap_or_default().limits();
        Self {
            user,
            scans_limit: limits.scans,
            takedowns_limit: limits.takedowns,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// List every user, oldest first.
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool)
        .await
        .or_store_error("Failed to fetch users")?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users
///
/// Create a user. The plan defaults to `Free`. A duplicate email is a 409
/// via the `uq_users_email` constraint.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let plan = match input.plan.as_deref() {
        Some(raw) => raw.parse::<Plan>()?,
        None => Plan::default(),
    };

    let dto = CreateUser {
        email: input.email.trim().to_string(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        avatar: input.avatar,
        plan: plan.as_str().to_string(),
    };

    let user = UserRepo::create(&state.pool, &dto).await?;

    tracing::info!(user_id = user.id, plan = %plan, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PATCH /api/v1/users/{id}
///
/// Change a user's plan. The id, the body and the plan are all checked, in
/// that order, before the store is touched. Every malformed input is a 400.
pub async fn update_user_plan(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdatePlanRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let id: DbId = raw_id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid user id '{raw_id}'")))?;

    let Json(input) = body.map_err(|rejection| {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let plan: Plan = input
        .plan
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("plan is required".to_string()))?
        .parse()
        .map_err(|e: CoreError| AppError::BadRequest(e.to_string()))?;

    let user = UserRepo::update_plan(&state.pool, id, plan.as_str())
        .await
        .or_store_error("Failed to update user plan")?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, plan = %plan, "User plan updated");

    Ok(Json(UserResponse::from(user)))
}

/// GET /api/v1/users/{id}/scan-requests
///
/// A user's own scan requests, newest first.
pub async fn list_user_scan_requests(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScanRequest>>>> {
    ensure_user_exists(&state, id).await?;

    let requests = ScanRequestRepo::list_for_user(&state.pool, id)
        .await
        .or_store_error("Failed to fetch scan requests")?;

    Ok(Json(DataResponse { data: requests }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a user or fail with 404.
pub async fn ensure_user_exists(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Turn a plan-limited insert into the created row, a 404 for an unknown
/// owner, or a 409 once the plan ceiling for `resource` is reached.
pub fn quota_outcome<T>(outcome: QuotaInsert<T>, resource: &str, user_id: DbId) -> AppResult<T> {
    match outcome {
        QuotaInsert::Created(row) => Ok(row),
        QuotaInsert::OwnerNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })),
        QuotaInsert::LimitReached { used, limit } => {
            tracing::info!(user_id, resource, used, limit, "Plan limit reached");
            Err(AppError::Core(quota_exceeded(resource, used, limit)))
        }
    }
}
