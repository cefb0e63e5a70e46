//! Handlers for the `/dmca-templates` resource.
//!
//! Templates live in process memory behind an `RwLock` and are reset to the
//! built-in set on restart.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use guardian_core::dmca::{
    extract_placeholders, render_template, DmcaTemplate, RenderedNotice, TemplateDraft,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /dmca-templates/{id}/render`.
#[derive(Debug, Default, Deserialize)]
pub struct RenderBody {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// A template with the placeholders its body uses.
#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: DmcaTemplate,
    pub placeholders: Vec<String>,
}

impl From<DmcaTemplate> for TemplateDetail {
    fn from(template: DmcaTemplate) -> Self {
        let placeholders = extract_placeholders(&template.template);
        Self {
            template,
            placeholders,
        }
    }
}

/// Body text of a template, ready to paste elsewhere.
#[derive(Debug, Serialize)]
pub struct TemplateCopy {
    pub id: String,
    pub template: String,
}

/// GET /api/v1/dmca-templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<DmcaTemplate>>> {
    let templates = state.templates.read().await.list().to_vec();
    Json(DataResponse { data: templates })
}

/// POST /api/v1/dmca-templates
///
/// Platform, subject and body are all required.
pub async fn create_template(
    State(state): State<AppState>,
    Json(draft): Json<TemplateDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<TemplateDetail>>)> {
    let template = state.templates.write().await.create(draft, Utc::now())?;

    tracing::info!(
        template_id = %template.id,
        platform = %template.platform,
        "DMCA template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template.into() })))
}

/// GET /api/v1/dmca-templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TemplateDetail>>> {
    let template = state.templates.read().await.get(&id)?.clone();
    Ok(Json(DataResponse { data: template.into() }))
}

/// PUT /api/v1/dmca-templates/{id}
///
/// Replace a template's fields in place. The id never changes.
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<TemplateDraft>,
) -> AppResult<Json<DataResponse<TemplateDetail>>> {
    let template = state
        .templates
        .write()
        .await
        .update(&id, draft, Utc::now())?;

    tracing::info!(template_id = %id, "DMCA template updated");

    Ok(Json(DataResponse { data: template.into() }))
}

/// DELETE /api/v1/dmca-templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let removed = state.templates.write().await.delete(&id)?;

    tracing::info!(
        template_id = %removed.id,
        platform = %removed.platform,
        "DMCA template deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/dmca-templates/{id}/copy
pub async fn copy_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TemplateCopy>>> {
    let template = state.templates.read().await.copy_body(&id)?;
    Ok(Json(DataResponse {
        data: TemplateCopy { id, template },
    }))
}

/// POST /api/v1/dmca-templates/{id}/render
///
/// Fill `{{token}}` placeholders. Tokens without a value stay in the body
/// and are listed under `unresolved`.
pub async fn render_dmca_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RenderBody>>,
) -> AppResult<Json<DataResponse<RenderedNotice>>> {
    let input = body.map(|Json(body)| body).unwrap_or_default();
    let templates = state.templates.read().await;
    let notice = render_template(templates.get(&id)?, &input.values);
    Ok(Json(DataResponse { data: notice }))
}
