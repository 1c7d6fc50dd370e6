//! Cascade: fans one master message out to many recipients.
//!
//! Flow: validate → resolve profiled recipients → create job (`running`) →
//!       generate + persist per recipient concurrently → complete job →
//!       enrich results.
//!
//! Each recipient attempt resolves to a `RecipientOutcome`; generation and
//! draft-insert errors become data and never cancel siblings. The job is
//! completed only after the join over every attempt, whatever the mix of
//! outcomes.

use std::collections::HashSet;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::cascade_prompt;
use crate::llm_client::{TextGenerator, MAX_OUTPUT_TOKENS};
use crate::models::draft::DraftStatus;
use crate::models::user::{ProfiledUser, UserWithProfile};
use crate::store::{NewDraft, Store};

/// Characters of the master content kept in a cascade draft's topic.
pub const TOPIC_PREFIX_CHARS: usize = 80;

/// Message surfaced to the caller for any per-recipient generation failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Generation failed for this user.";

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeRequest {
    #[serde(default)]
    pub master_content: String,
    pub user_ids: Option<Vec<String>>,
    pub created_by_id: Option<String>,
}

/// How one recipient's attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientOutcome {
    Success { draft_id: Uuid, content: String },
    Failure { reason: String },
}

/// One entry of the response's `results` array.
///
/// Failures carry an empty `draftId` and `content` plus `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeResult {
    pub user_id: Uuid,
    pub draft_id: String,
    pub content: String,
    pub user_name: String,
    pub user_role: String,
    pub user_company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeResponse {
    pub cascade_job_id: Uuid,
    pub results: Vec<CascadeResult>,
}

/// A request that passed input validation.
#[derive(Debug)]
struct ValidCascade {
    master_content: String,
    /// Unique, in first-seen order. Entries that are not UUIDs are dropped.
    user_ids: Vec<Uuid>,
    /// Distinct ids in the request, parseable or not.
    requested: usize,
    created_by_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs one cascade end to end.
///
/// Validation failures return before anything is persisted. A recipient whose
/// generation or draft insert fails gets an error entry in `results`; only the
/// recipient lookup and the job record itself can fail the request.
pub async fn run_cascade(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    request: CascadeRequest,
) -> Result<CascadeResponse, AppError> {
    let request = validate(request)?;

    // Step 1: resolve recipients that have a voice profile
    let found = store.find_profiled_users(&request.user_ids).await?;
    let recipients = order_recipients(&request.user_ids, found);

    if recipients.is_empty() {
        return Err(AppError::Validation(
            "None of the selected users have completed voice onboarding.".to_string(),
        ));
    }
    let skipped = request.requested - recipients.len();
    if skipped > 0 {
        info!("Cascade skipping {skipped} recipient(s) without a voice profile");
    }

    // Step 2: durable job record before any generation call
    let job = store
        .create_cascade_job(&request.master_content, request.created_by_id)
        .await?;
    info!(
        "Cascade job {} {} for {} recipient(s)",
        job.id,
        job.status,
        recipients.len()
    );

    // Step 3: fan out; join_all waits for every attempt and never short-circuits
    let topic = cascade_topic(&request.master_content);
    let attempts = recipients.iter().map(|recipient| {
        generate_for_recipient(
            store,
            llm,
            job.id,
            &request.master_content,
            &topic,
            recipient,
        )
    });
    let outcomes = join_all(attempts).await;

    // Step 4: unconditional completion, strictly after the join
    store.complete_cascade_job(job.id).await?;

    let results: Vec<CascadeResult> = recipients
        .iter()
        .zip(outcomes)
        .map(|(recipient, outcome)| enrich(recipient, outcome))
        .collect();

    let succeeded = results.iter().filter(|r| r.error.is_none()).count();
    info!(
        "Cascade job {} complete: {succeeded}/{} succeeded",
        job.id,
        recipients.len()
    );

    Ok(CascadeResponse {
        cascade_job_id: job.id,
        results,
    })
}

/// One recipient's attempt. Every error is folded into
/// `RecipientOutcome::Failure`.
async fn generate_for_recipient(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    job_id: Uuid,
    master_content: &str,
    topic: &str,
    recipient: &ProfiledUser,
) -> RecipientOutcome {
    let prompt = cascade_prompt(&recipient.user, &recipient.profile, master_content);

    let content = match llm
        .generate(&prompt.system, &prompt.user, MAX_OUTPUT_TOKENS)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!(
                "Cascade job {job_id}: empty generation for user {}",
                recipient.user.id
            );
            return failure();
        }
        Err(e) => {
            warn!(
                "Cascade job {job_id}: generation failed for user {}: {e}",
                recipient.user.id
            );
            return failure();
        }
    };

    let saved = store
        .create_draft(NewDraft {
            user_id: recipient.user.id,
            content,
            topic: topic.to_string(),
            status: DraftStatus::Draft,
            cascade_job_id: Some(job_id),
        })
        .await;

    match saved {
        Ok(draft) => RecipientOutcome::Success {
            draft_id: draft.id,
            content: draft.content,
        },
        Err(e) => {
            error!(
                "Cascade job {job_id}: failed to save draft for user {}: {e}",
                recipient.user.id
            );
            failure()
        }
    }
}

fn failure() -> RecipientOutcome {
    RecipientOutcome::Failure {
        reason: GENERATION_FAILED_MESSAGE.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate(request: CascadeRequest) -> Result<ValidCascade, AppError> {
    let master_content = request.master_content.trim();
    if master_content.is_empty() {
        return Err(AppError::Validation("masterContent is required.".to_string()));
    }
    let raw_ids = request.user_ids.unwrap_or_default();
    if raw_ids.is_empty() {
        return Err(AppError::Validation(
            "Select at least one team member.".to_string(),
        ));
    }
    let created_by_id = request
        .created_by_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("createdById is required.".to_string()))?;
    let created_by_id = Uuid::parse_str(created_by_id)
        .map_err(|_| AppError::Validation("createdById is not a valid id.".to_string()))?;

    let mut seen = HashSet::new();
    let distinct: Vec<&str> = raw_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| seen.insert(*id))
        .collect();
    let mut parsed = HashSet::new();
    let user_ids = distinct
        .iter()
        .filter_map(|id| Uuid::parse_str(id).ok())
        .filter(|id| parsed.insert(*id))
        .collect();

    Ok(ValidCascade {
        master_content: master_content.to_string(),
        user_ids,
        requested: distinct.len(),
        created_by_id,
    })
}

/// Orders resolved recipients by their position in `requested`.
/// Entries without a profile are dropped.
fn order_recipients(
    requested: &[Uuid],
    found: Vec<UserWithProfile>,
) -> Vec<ProfiledUser> {
    let mut profiled: Vec<ProfiledUser> = found
        .into_iter()
        .filter_map(|u| u.into_profiled())
        .filter(|p| requested.contains(&p.user.id))
        .collect();
    profiled.sort_by_key(|p| requested.iter().position(|id| *id == p.user.id));
    profiled.dedup_by_key(|p| p.user.id);
    profiled
}

/// `"Cascade: "` + the first 80 characters, with `...` when truncated.
pub fn cascade_topic(master_content: &str) -> String {
    let mut chars = master_content.chars();
    let prefix: String = chars.by_ref().take(TOPIC_PREFIX_CHARS).collect();
    let ellipsis = if chars.next().is_some() { "..." } else { "" };
    format!("Cascade: {prefix}{ellipsis}")
}

fn enrich(recipient: &ProfiledUser, outcome: RecipientOutcome) -> CascadeResult {
    let (draft_id, content, error) = match outcome {
        RecipientOutcome::Success { draft_id, content } => (draft_id.to_string(), content, None),
        RecipientOutcome::Failure { reason } => (String::new(), String::new(), Some(reason)),
    };
    CascadeResult {
        user_id: recipient.user.id,
        draft_id,
        content,
        user_name: recipient.user.name.clone(),
        user_role: recipient.user.role.clone(),
        user_company: recipient.user.company.clone(),
        error,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
