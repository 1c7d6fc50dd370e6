//! Axum route handlers for post generation.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::generation::cascade::{run_cascade, CascadeRequest, CascadeResponse};
use crate::generation::draft::{generate_draft, GenerateDraftRequest, GenerateDraftResponse};
use crate::models::cascade::CascadeJob;
use crate::models::draft::Draft;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CascadeJobResponse {
    pub job: CascadeJob,
    pub drafts: Vec<Draft>,
}

/// POST /api/generate-draft
pub async fn handle_generate_draft(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateDraftRequest>,
) -> Result<Json<GenerateDraftResponse>, AppError> {
    let response = generate_draft(state.store.as_ref(), state.llm.as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /api/cascade
///
/// Per-recipient generation failures are reported inside `results`; the
/// response is still 200. Callers must inspect each entry's `error`.
pub async fn handle_cascade(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CascadeRequest>,
) -> Result<Json<CascadeResponse>, AppError> {
    let response = run_cascade(state.store.as_ref(), state.llm.as_ref(), request).await?;
    Ok(Json(response))
}

/// GET /api/cascade/:id
pub async fn handle_get_cascade(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<CascadeJobResponse>, AppError> {
    let job = state
        .store
        .get_cascade_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Cascade job {job_id} not found")))?;
    let drafts = state.store.list_job_drafts(job_id).await?;
    Ok(Json(CascadeJobResponse { job, drafts }))
}
