//! Route definitions for the `/scan-results` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::scan_requests;
use crate::state::AppState;

/// Routes mounted at `/scan-results`.
///
/// ```text
/// POST   /                             -> submit_scan_result
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(scan_requests::submit_scan_result))
}
