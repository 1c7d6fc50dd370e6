//! In-memory `Store` used by unit and router tests.
//!
//! Records every write into an optional shared event log so tests can assert
//! on the relative order of persistence writes and generation calls.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::cascade::{CascadeJob, CascadeStatus};
use crate::models::draft::Draft;
use crate::models::user::{User, UserWithProfile, VoiceProfile};
use crate::store::{DraftUpdate, NewDraft, NewUser, NewVoiceProfile, Store, StoreError};

/// Ordered record of side effects shared between test doubles.
pub type EventLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<VoiceProfile>,
    jobs: Vec<CascadeJob>,
    drafts: Vec<Draft>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    log: EventLog,
    failing_draft_users: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// Seeds a user, optionally with a voice profile. Returns the user id.
    pub fn seed_user(&self, name: &str, role: &str, company: &str, with_profile: bool) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: role.to_string(),
            company: company.to_string(),
            industry: "Technology".to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        let mut tables = self.tables.lock().unwrap();
        if with_profile {
            tables.profiles.push(VoiceProfile {
                id: Uuid::new_v4(),
                user_id: id,
                tone: vec![
                    "direct".to_string(),
                    "warm".to_string(),
                    "curious".to_string(),
                ],
                sentence_style: "short".to_string(),
                vocabulary: "conversational".to_string(),
                signature_phrases: vec!["Here's the thing:".to_string()],
                topics: vec!["engineering culture".to_string()],
                avoid: vec!["synergy".to_string()],
                raw_summary: format!("{name} writes short, punchy posts."),
                samples: vec!["Shipped it. Learned a lot.".to_string()],
                created_at: Utc::now(),
            });
        }
        tables.users.push(user);
        id
    }

    /// Makes every `create_draft` for `user_id` fail with a database error.
    pub fn fail_drafts_for(&self, user_id: Uuid) {
        self.failing_draft_users.lock().unwrap().insert(user_id);
    }

    pub fn jobs(&self) -> Vec<CascadeJob> {
        self.tables.lock().unwrap().jobs.clone()
    }

    pub fn drafts(&self) -> Vec<Draft> {
        self.tables.lock().unwrap().drafts.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.tables.lock().unwrap().users.clone()
    }

    fn record(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }

    fn profile_of(tables: &Tables, user_id: Uuid) -> Option<VoiceProfile> {
        tables
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewVoiceProfile,
    ) -> Result<UserWithProfile, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            role: user.role,
            company: user.company,
            industry: user.industry,
            created_at: Utc::now(),
        };
        let profile = VoiceProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            tone: profile.tone,
            sentence_style: profile.sentence_style,
            vocabulary: profile.vocabulary,
            signature_phrases: profile.signature_phrases,
            topics: profile.topics,
            avoid: profile.avoid,
            raw_summary: profile.raw_summary,
            samples: profile.samples,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.lock().unwrap();
        tables.users.push(user.clone());
        tables.profiles.push(profile.clone());
        drop(tables);
        self.record(format!("user:create:{}", user.name));

        Ok(UserWithProfile {
            user,
            voice_profile: Some(profile),
        })
    }

    async fn get_user_with_profile(
        &self,
        id: Uuid,
    ) -> Result<Option<UserWithProfile>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .map(|user| UserWithProfile {
                voice_profile: Self::profile_of(&tables, user.id),
                user,
            }))
    }

    async fn list_users(&self) -> Result<Vec<UserWithProfile>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .cloned()
            .map(|user| UserWithProfile {
                voice_profile: Self::profile_of(&tables, user.id),
                user,
            })
            .collect())
    }

    async fn find_profiled_users(&self, ids: &[Uuid]) -> Result<Vec<UserWithProfile>, StoreError> {
        let tables = self.tables.lock().unwrap();
        // Reverse insertion order so callers cannot rely on store ordering.
        Ok(tables
            .users
            .iter()
            .rev()
            .filter(|u| ids.contains(&u.id))
            .filter_map(|u| {
                Self::profile_of(&tables, u.id).map(|p| UserWithProfile {
                    user: u.clone(),
                    voice_profile: Some(p),
                })
            })
            .collect())
    }

    async fn create_cascade_job(
        &self,
        master_content: &str,
        created_by_id: Uuid,
    ) -> Result<CascadeJob, StoreError> {
        let job = CascadeJob {
            id: Uuid::new_v4(),
            master_content: master_content.to_string(),
            status: CascadeStatus::Running,
            created_by_id,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.tables.lock().unwrap().jobs.push(job.clone());
        self.record("job:create".to_string());
        Ok(job)
    }

    async fn complete_cascade_job(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let job = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "cascade job",
                id: id.to_string(),
            })?;
        job.status = CascadeStatus::Complete;
        job.completed_at = Some(Utc::now());
        drop(tables);
        self.record("job:complete".to_string());
        Ok(())
    }

    async fn get_cascade_job(&self, id: Uuid) -> Result<Option<CascadeJob>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned())
    }

    async fn list_job_drafts(&self, job_id: Uuid) -> Result<Vec<Draft>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .drafts
            .iter()
            .filter(|d| d.cascade_job_id == Some(job_id))
            .cloned()
            .collect())
    }

    async fn create_draft(&self, draft: NewDraft) -> Result<Draft, StoreError> {
        if self
            .failing_draft_users
            .lock()
            .unwrap()
            .contains(&draft.user_id)
        {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let now = Utc::now();
        let row = Draft {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            content: draft.content,
            topic: draft.topic,
            status: draft.status.as_str().to_string(),
            cascade_job_id: draft.cascade_job_id,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().drafts.push(row.clone());
        self.record(format!("draft:create:{}", row.user_id));
        Ok(row)
    }

    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<Draft, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let draft = tables
            .drafts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "draft",
                id: id.to_string(),
            })?;
        if let Some(content) = update.content {
            draft.content = content;
        }
        if let Some(status) = update.status {
            draft.status = status.as_str().to_string();
        }
        draft.updated_at = Utc::now();
        Ok(draft.clone())
    }

    async fn list_user_drafts(&self, user_id: Uuid) -> Result<Vec<Draft>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .drafts
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }
}
