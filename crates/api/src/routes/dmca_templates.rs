//! Route definitions for the `/dmca-templates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dmca_templates;
use crate::state::AppState;

/// Routes mounted at `/dmca-templates`.
///
/// ```text
/// GET    /                             -> list_templates
/// POST   /                             -> create_template
/// GET    /{id}                         -> get_template
/// PUT    /{id}                         -> update_template
/// DELETE /{id}                         -> delete_template
/// GET    /{id}/copy                    -> copy_template
/// POST   /{id}/render                  -> render_dmca_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(dmca_templates::list_templates).post(dmca_templates::create_template),
        )
        .route(
            "/{id}",
            get(dmca_templates::get_template)
                .put(dmca_templates::update_template)
                .delete(dmca_templates::delete_template),
        )
        .route("/{id}/copy", get(dmca_templates::copy_template))
        .route("/{id}/render", post(dmca_templates::render_dmca_template))
}
