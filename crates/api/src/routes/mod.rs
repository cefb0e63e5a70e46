pub mod dashboard;
pub mod dmca_templates;
pub mod health;
pub mod scan_requests;
pub mod scan_results;
pub mod takedowns;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard/stats                                 admin summary counters
///
/// /users                                           list, create
/// /users/{id}                                      change plan (PATCH)
/// /users/{id}/scan-requests                        a user's requests
///
/// /scan-requests                                   submit (POST)
/// /scan-requests/pending                           review queue
/// /scan-requests/{id}                              get
/// /scan-requests/{id}/status                       decide (PATCH)
/// /scan-requests/{id}/approve                      approve with findings (POST)
/// /scan-requests/{id}/reject                       reject (POST)
/// /scan-requests/{id}/results                      findings for a request
///
/// /scan-results                                    submit findings (POST)
///
/// /takedown-requests                               list (?platform=), create
/// /takedown-requests/{id}                          get
/// /takedown-requests/{id}/status                   set status (PATCH)
/// /takedown-requests/{id}/dmca-draft               render notice (POST)
/// /takedown-requests/{id}/dmca-filing              record filing (POST)
///
/// /dmca-templates                                  list, create
/// /dmca-templates/{id}                             get, update, delete
/// /dmca-templates/{id}/copy                        body text (GET)
/// /dmca-templates/{id}/render                      fill placeholders (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/users", users::router())
        .nest("/scan-requests", scan_requests::router())
        .nest("/scan-results", scan_results::router())
        .nest("/takedown-requests", takedowns::router())
        .nest("/dmca-templates", dmca_templates::router())
}
