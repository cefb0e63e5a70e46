//! Route definitions for the `/users` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                             -> list_users
/// POST   /                             -> create_user
/// PATCH  /{id}                         -> update_user_plan
/// GET    /{id}/scan-requests           -> list_user_scan_requests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", patch(users::update_user_plan))
        .route("/{id}/scan-requests", get(users::list_user_scan_requests))
}
