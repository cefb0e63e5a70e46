//! Handler for the admin dashboard summary.

use axum::extract::State;
use axum::Json;
use guardian_db::models::dashboard::DashboardCounts;
use guardian_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard counters: persisted counts plus the in-memory template set.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub counts: DashboardCounts,
    pub template_count: usize,
    pub template_platforms: Vec<String>,
}

/// GET /api/v1/dashboard/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let counts = DashboardRepo::counts(&state.pool).await?;

    let templates = state.templates.read().await;
    let stats = DashboardStats {
        counts,
        template_count: templates.len(),
        template_platforms: templates.platforms(),
    };

    Ok(Json(DataResponse { data: stats }))
}
