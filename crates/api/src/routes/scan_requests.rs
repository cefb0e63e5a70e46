//! Route definitions for the `/scan-requests` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::scan_requests;
use crate::state::AppState;

/// Routes mounted at `/scan-requests`.
///
/// ```text
/// POST   /                             -> create_scan_request
/// GET    /pending                      -> list_pending
/// GET    /{id}                         -> get_scan_request
/// PATCH  /{id}/status                  -> update_status
/// POST   /{id}/approve                 -> approve
/// POST   /{id}/reject                  -> reject
/// GET    /{id}/results                 -> list_results
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scan_requests::create_scan_request))
        .route("/pending", get(scan_requests::list_pending))
        .route("/{id}", get(scan_requests::get_scan_request))
        .route("/{id}/status", patch(scan_requests::update_status))
        .route("/{id}/approve", post(scan_requests::approve))
        .route("/{id}/reject", post(scan_requests::reject))
        .route("/{id}/results", get(scan_requests::list_results))
}
