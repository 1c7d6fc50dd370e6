use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub created_at: DateTime<Utc>,
}

/// Structured description of how a user writes. Created once during
/// onboarding and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Usually three short adjectives.
    pub tone: Vec<String>,
    /// `short | medium | long | mixed`, stored as returned by the model.
    pub sentence_style: String,
    /// `conversational | professional | technical`, stored as returned by the model.
    pub vocabulary: String,
    pub signature_phrases: Vec<String>,
    pub topics: Vec<String>,
    pub avoid: Vec<String>,
    pub raw_summary: String,
    /// The writing samples the profile was derived from.
    pub samples: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A user as listed by the API; onboarding may not have produced a profile yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub voice_profile: Option<VoiceProfile>,
}

impl UserWithProfile {
    /// Splits into a `ProfiledUser` when a profile is attached.
    pub fn into_profiled(self) -> Option<ProfiledUser> {
        let profile = self.voice_profile?;
        Some(ProfiledUser {
            user: self.user,
            profile,
        })
    }
}

/// A user that is eligible for generation.
#[derive(Debug, Clone)]
pub struct ProfiledUser {
    pub user: User,
    pub profile: VoiceProfile,
}
