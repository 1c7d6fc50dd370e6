//! Voice extraction: turns writing samples into a stored `VoiceProfile`.
//!
//! Flow: validate identity + samples → LLM analysis → lenient JSON parse →
//!       create user and profile in one transaction.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{generate_json, TextGenerator, MAX_OUTPUT_TOKENS};
use crate::models::user::VoiceProfile;
use crate::store::{NewUser, NewVoiceProfile, Store};
use crate::voice::prompts::voice_extraction_prompt;

/// Minimum number of non-empty samples needed for an analysis.
pub const MIN_SAMPLES: usize = 2;

const SENTENCE_STYLES: [&str; 4] = ["short", "medium", "long", "mixed"];
const VOCABULARIES: [&str; 3] = ["conversational", "professional", "technical"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub industry: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeVoiceRequest {
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeVoiceResponse {
    pub user_id: Uuid,
    pub voice_profile: VoiceProfile,
}

/// Shape the analysis model is asked to return. Every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceProfileData {
    pub tone: Vec<String>,
    pub sentence_style: String,
    pub vocabulary: String,
    pub signature_phrases: Vec<String>,
    pub topics: Vec<String>,
    pub avoid: Vec<String>,
    pub raw_summary: String,
}

pub async fn analyze_voice(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    request: AnalyzeVoiceRequest,
) -> Result<AnalyzeVoiceResponse, AppError> {
    let info = request
        .user_info
        .filter(|i| {
            [&i.name, &i.role, &i.company, &i.industry]
                .iter()
                .all(|f| !f.trim().is_empty())
        })
        .ok_or_else(|| AppError::Validation("Missing required user info fields.".to_string()))?;

    let samples: Vec<String> = request
        .samples
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if samples.len() < MIN_SAMPLES {
        return Err(AppError::Validation(
            "At least 2 writing samples are required.".to_string(),
        ));
    }

    let prompt = voice_extraction_prompt(&info, &samples);
    let data: VoiceProfileData =
        generate_json(llm, &prompt.system, &prompt.user, MAX_OUTPUT_TOKENS)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse voice analysis response: {e}")))?;

    if !SENTENCE_STYLES.contains(&data.sentence_style.as_str()) {
        warn!("Unexpected sentence_style from voice analysis: {:?}", data.sentence_style);
    }
    if !VOCABULARIES.contains(&data.vocabulary.as_str()) {
        warn!("Unexpected vocabulary from voice analysis: {:?}", data.vocabulary);
    }

    let created = store
        .create_user_with_profile(
            NewUser {
                name: info.name.trim().to_string(),
                role: info.role.trim().to_string(),
                company: info.company.trim().to_string(),
                industry: info.industry.trim().to_string(),
            },
            NewVoiceProfile {
                tone: data.tone,
                sentence_style: data.sentence_style,
                vocabulary: data.vocabulary,
                signature_phrases: data.signature_phrases,
                topics: data.topics,
                avoid: data.avoid,
                raw_summary: data.raw_summary,
                samples,
            },
        )
        .await?;

    let user_id = created.user.id;
    let voice_profile = created.voice_profile.ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Voice profile missing after insert for {user_id}"))
    })?;
    info!("Onboarded user {user_id} from {} samples", voice_profile.samples.len());

    Ok(AnalyzeVoiceResponse {
        user_id,
        voice_profile,
    })
}
