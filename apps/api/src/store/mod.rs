//! Persistence boundary.
//!
//! Handlers and workflows only see the `Store` trait; `AppState` carries an
//! `Arc<dyn Store>` backed by `PgStore` in production.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::cascade::CascadeJob;
use crate::models::draft::{Draft, DraftStatus};
use crate::models::user::UserWithProfile;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Identity fields captured during onboarding.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
}

#[derive(Debug, Clone)]
pub struct NewVoiceProfile {
    pub tone: Vec<String>,
    pub sentence_style: String,
    pub vocabulary: String,
    pub signature_phrases: Vec<String>,
    pub topics: Vec<String>,
    pub avoid: Vec<String>,
    pub raw_summary: String,
    pub samples: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewDraft {
    pub user_id: Uuid,
    pub content: String,
    pub topic: String,
    pub status: DraftStatus,
    pub cascade_job_id: Option<Uuid>,
}

/// Partial update of a draft. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct DraftUpdate {
    pub content: Option<String>,
    pub status: Option<DraftStatus>,
}

impl DraftUpdate {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.status.is_none()
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Creates the user and its voice profile atomically.
    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewVoiceProfile,
    ) -> Result<UserWithProfile, StoreError>;

    async fn get_user_with_profile(&self, id: Uuid)
        -> Result<Option<UserWithProfile>, StoreError>;

    async fn list_users(&self) -> Result<Vec<UserWithProfile>, StoreError>;

    /// Returns the users among `ids` that have a voice profile attached.
    /// Every returned entry has `voice_profile` set. Order is unspecified.
    async fn find_profiled_users(&self, ids: &[Uuid]) -> Result<Vec<UserWithProfile>, StoreError>;

    /// Inserts a job in the `running` state.
    async fn create_cascade_job(
        &self,
        master_content: &str,
        created_by_id: Uuid,
    ) -> Result<CascadeJob, StoreError>;

    async fn complete_cascade_job(&self, id: Uuid) -> Result<(), StoreError>;

    async fn get_cascade_job(&self, id: Uuid) -> Result<Option<CascadeJob>, StoreError>;

    async fn list_job_drafts(&self, job_id: Uuid) -> Result<Vec<Draft>, StoreError>;

    async fn create_draft(&self, draft: NewDraft) -> Result<Draft, StoreError>;

    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<Draft, StoreError>;

    /// Newest first.
    async fn list_user_drafts(&self, user_id: Uuid) -> Result<Vec<Draft>, StoreError>;
}
