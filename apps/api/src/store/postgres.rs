use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::cascade::{CascadeJob, CascadeStatus};
use crate::models::draft::{Draft, DraftStatus};
use crate::models::user::{User, UserWithProfile, VoiceProfile};
use crate::store::{DraftUpdate, NewDraft, NewUser, NewVoiceProfile, Store, StoreError};

/// PostgreSQL-backed store. Cloning is cheap; the pool is shared.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user_with_profile(
        &self,
        user: NewUser,
        profile: NewVoiceProfile,
    ) -> Result<UserWithProfile, StoreError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, role, company, industry)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.company)
        .bind(&user.industry)
        .fetch_one(&mut *tx)
        .await?;

        let voice_profile = sqlx::query_as::<_, VoiceProfile>(
            r#"
            INSERT INTO voice_profiles
                (id, user_id, tone, sentence_style, vocabulary, signature_phrases,
                 topics, avoid, raw_summary, samples)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&profile.tone)
        .bind(&profile.sentence_style)
        .bind(&profile.vocabulary)
        .bind(&profile.signature_phrases)
        .bind(&profile.topics)
        .bind(&profile.avoid)
        .bind(&profile.raw_summary)
        .bind(&profile.samples)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Created user {} with voice profile {}", user.id, voice_profile.id);

        Ok(UserWithProfile {
            user,
            voice_profile: Some(voice_profile),
        })
    }

    async fn get_user_with_profile(
        &self,
        id: Uuid,
    ) -> Result<Option<UserWithProfile>, StoreError> {
        let Some(user) = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let voice_profile =
            sqlx::query_as::<_, VoiceProfile>("SELECT * FROM voice_profiles WHERE user_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(Some(UserWithProfile {
            user,
            voice_profile,
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserWithProfile>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        let profiles = sqlx::query_as::<_, VoiceProfile>("SELECT * FROM voice_profiles")
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_profiles(users, profiles))
    }

    async fn find_profiled_users(&self, ids: &[Uuid]) -> Result<Vec<UserWithProfile>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            WHERE u.id = ANY($1)
              AND EXISTS (SELECT 1 FROM voice_profiles vp WHERE vp.user_id = u.id)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let profiles = sqlx::query_as::<_, VoiceProfile>(
            "SELECT * FROM voice_profiles WHERE user_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Resolved {} profiled users from {} requested ids",
            users.len(),
            ids.len()
        );

        Ok(attach_profiles(users, profiles)
            .into_iter()
            .filter(|u| u.voice_profile.is_some())
            .collect())
    }

    async fn create_cascade_job(
        &self,
        master_content: &str,
        created_by_id: Uuid,
    ) -> Result<CascadeJob, StoreError> {
        Ok(sqlx::query_as::<_, CascadeJob>(
            r#"
            INSERT INTO cascade_jobs (id, master_content, status, created_by_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(master_content)
        .bind(CascadeStatus::Running)
        .bind(created_by_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn complete_cascade_job(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE cascade_jobs SET status = $1, completed_at = now() WHERE id = $2",
        )
        .bind(CascadeStatus::Complete)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "cascade job",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn get_cascade_job(&self, id: Uuid) -> Result<Option<CascadeJob>, StoreError> {
        Ok(
            sqlx::query_as::<_, CascadeJob>("SELECT * FROM cascade_jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_job_drafts(&self, job_id: Uuid) -> Result<Vec<Draft>, StoreError> {
        Ok(sqlx::query_as::<_, Draft>(
            "SELECT * FROM drafts WHERE cascade_job_id = $1 ORDER BY created_at, id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_draft(&self, draft: NewDraft) -> Result<Draft, StoreError> {
        Ok(sqlx::query_as::<_, Draft>(
            r#"
            INSERT INTO drafts (id, user_id, content, topic, status, cascade_job_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(draft.user_id)
        .bind(&draft.content)
        .bind(&draft.topic)
        .bind(draft.status.as_str())
        .bind(draft.cascade_job_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_draft(&self, id: Uuid, update: DraftUpdate) -> Result<Draft, StoreError> {
        sqlx::query_as::<_, Draft>(
            r#"
            UPDATE drafts
            SET content = COALESCE($2, content),
                status = COALESCE($3, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.content)
        .bind(update.status.as_ref().map(DraftStatus::as_str))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "draft",
            id: id.to_string(),
        })
    }

    async fn list_user_drafts(&self, user_id: Uuid) -> Result<Vec<Draft>, StoreError> {
        Ok(sqlx::query_as::<_, Draft>(
            "SELECT * FROM drafts WHERE user_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Pairs each user with its profile, keeping the order of `users`.
fn attach_profiles(users: Vec<User>, profiles: Vec<VoiceProfile>) -> Vec<UserWithProfile> {
    let mut by_user: HashMap<Uuid, VoiceProfile> =
        profiles.into_iter().map(|p| (p.user_id, p)).collect();

    users
        .into_iter()
        .map(|user| {
            let voice_profile = by_user.remove(&user.id);
            UserWithProfile {
                user,
                voice_profile,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: "Engineer".to_string(),
            company: "Acme".to_string(),
            industry: "Software".to_string(),
            created_at: Utc::now(),
        }
    }

    fn profile_for(user_id: Uuid) -> VoiceProfile {
        VoiceProfile {
            id: Uuid::new_v4(),
            user_id,
            tone: vec!["direct".to_string()],
            sentence_style: "short".to_string(),
            vocabulary: "technical".to_string(),
            signature_phrases: vec![],
            topics: vec![],
            avoid: vec![],
            raw_summary: "Terse.".to_string(),
            samples: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_profiles_keeps_user_order() {
        let a = user("a");
        let b = user("b");
        let c = user("c");
        let profiles = vec![profile_for(c.id), profile_for(a.id)];

        let joined = attach_profiles(vec![a.clone(), b.clone(), c.clone()], profiles);

        assert_eq!(joined.len(), 3);
        assert_eq!(joined[0].user.id, a.id);
        assert_eq!(joined[1].user.id, b.id);
        assert_eq!(joined[2].user.id, c.id);
        assert!(joined[0].voice_profile.is_some());
        assert!(joined[1].voice_profile.is_none());
        assert_eq!(joined[2].voice_profile.as_ref().unwrap().user_id, c.id);
    }

    #[test]
    fn test_attach_profiles_ignores_orphan_profiles() {
        let a = user("a");
        let joined = attach_profiles(vec![a.clone()], vec![profile_for(Uuid::new_v4())]);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].voice_profile.is_none());
    }
}
