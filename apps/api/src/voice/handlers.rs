use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::user::UserWithProfile;
use crate::state::AppState;
use crate::voice::extraction::{analyze_voice, AnalyzeVoiceRequest, AnalyzeVoiceResponse};

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserWithProfile>,
}

/// POST /api/analyze-voice
pub async fn handle_analyze_voice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeVoiceRequest>,
) -> Result<Json<AnalyzeVoiceResponse>, AppError> {
    let response = analyze_voice(state.store.as_ref(), state.llm.as_ref(), request).await?;
    Ok(Json(response))
}

/// GET /api/users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(UserListResponse { users }))
}
