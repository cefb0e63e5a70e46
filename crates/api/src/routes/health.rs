//! Root-level liveness endpoint.
//!
//! Reports whether the store answers, which migration it is at, and how many
//! DMCA templates the in-memory store holds. Always 200 so load balancers can
//! tell "up but degraded" from "down".

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub dmca_templates: usize,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Newest applied migration. `None` when unreachable or unmigrated.
    pub schema_version: Option<i64>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match guardian_db::schema_version(&state.pool).await {
        Ok(schema_version) => DatabaseHealth {
            reachable: true,
            schema_version,
        },
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            DatabaseHealth {
                reachable: false,
                schema_version: None,
            }
        }
    };

    Json(HealthResponse {
        status: if database.reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        dmca_templates: state.templates.read().await.len(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
