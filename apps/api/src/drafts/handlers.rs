use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::draft::{Draft, DraftStatus};
use crate::state::AppState;
use crate::store::DraftUpdate;

#[derive(Debug, Deserialize)]
pub struct UpdateDraftRequest {
    pub content: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct DraftResponse {
    pub draft: Draft,
}

#[derive(Serialize)]
pub struct DraftListResponse {
    pub drafts: Vec<Draft>,
}

/// PATCH /api/drafts/:id
pub async fn handle_update_draft(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateDraftRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let status = req
        .status
        .as_deref()
        .map(str::parse::<DraftStatus>)
        .transpose()
        .map_err(AppError::Validation)?;
    let update = DraftUpdate {
        content: req.content,
        status,
    };
    if update.is_empty() {
        return Err(AppError::Validation("No fields to update.".to_string()));
    }

    let draft = state.store.update_draft(id, update).await?;
    Ok(Json(DraftResponse { draft }))
}

/// GET /api/users/:id/drafts
pub async fn handle_list_user_drafts(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<DraftListResponse>, AppError> {
    let drafts = state.store.list_user_drafts(user_id).await?;
    Ok(Json(DraftListResponse { drafts }))
}
