//! Route definitions for the `/takedown-requests` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::takedowns;
use crate::state::AppState;

/// Routes mounted at `/takedown-requests`.
///
/// ```text
/// GET    /                             -> list_takedowns (?platform=)
/// POST   /                             -> create_takedown
/// GET    /{id}                         -> get_takedown
/// PATCH  /{id}/status                  -> update_takedown_status
/// POST   /{id}/dmca-draft              -> draft_dmca_notice
/// POST   /{id}/dmca-filing             -> file_dmca_notice
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(takedowns::list_takedowns).post(takedowns::create_takedown),
        )
        .route("/{id}", get(takedowns::get_takedown))
        .route("/{id}/status", patch(takedowns::update_takedown_status))
        .route("/{id}/dmca-draft", post(takedowns::draft_dmca_notice))
        .route("/{id}/dmca-filing", post(takedowns::file_dmca_notice))
}
