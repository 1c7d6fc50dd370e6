//! Single-draft generation: one user, one topic, one persisted draft.
//! No cascade job is created.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::draft_prompt;
use crate::llm_client::{TextGenerator, MAX_OUTPUT_TOKENS};
use crate::models::draft::DraftStatus;
use crate::store::{NewDraft, Store};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub topic: String,
    pub raw_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftResponse {
    pub draft_id: Uuid,
    pub content: String,
}

pub async fn generate_draft(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    request: GenerateDraftRequest,
) -> Result<GenerateDraftResponse, AppError> {
    let topic = request.topic.trim();
    let user_id = match request.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() && !topic.is_empty() => id,
        _ => {
            return Err(AppError::Validation(
                "userId and topic are required.".to_string(),
            ))
        }
    };
    let not_found = || AppError::NotFound("User not found.".to_string());

    let user_id = Uuid::parse_str(user_id).map_err(|_| not_found())?;
    let found = store
        .get_user_with_profile(user_id)
        .await?
        .ok_or_else(not_found)?;
    let recipient = found.into_profiled().ok_or_else(|| {
        AppError::Validation("This user has not completed voice onboarding.".to_string())
    })?;

    let prompt = draft_prompt(
        &recipient.user,
        &recipient.profile,
        topic,
        request.raw_notes.as_deref(),
    );
    let content = llm
        .generate(&prompt.system, &prompt.user, MAX_OUTPUT_TOKENS)
        .await
        .map_err(|e| AppError::Llm(format!("Draft generation failed: {e}")))?;
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Llm(
            "Generation produced empty content.".to_string(),
        ));
    }

    let draft = store
        .create_draft(NewDraft {
            user_id,
            content: content.to_string(),
            topic: topic.to_string(),
            status: DraftStatus::Draft,
            cascade_job_id: None,
        })
        .await?;

    info!("Generated draft {} for user {user_id}", draft.id);

    Ok(GenerateDraftResponse {
        draft_id: draft.id,
        content: draft.content,
    })
}
