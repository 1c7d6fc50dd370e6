//! Demo data: one fully onboarded user to try drafts and cascades against.
//! Enabled at startup with `SEED_DEMO_DATA=true`.

use tracing::info;
use uuid::Uuid;

use crate::store::{NewUser, NewVoiceProfile, Store, StoreError};

pub const DEMO_USER_NAME: &str = "Alex Rivera";

/// Creates the demo user unless a profiled user with the same name exists.
/// Returns the demo user's id either way.
pub async fn seed_demo_user(store: &dyn Store) -> Result<Uuid, StoreError> {
    let existing = store
        .list_users()
        .await?
        .into_iter()
        .find(|u| u.user.name == DEMO_USER_NAME && u.voice_profile.is_some());
    if let Some(found) = existing {
        info!("Demo user already present: {}", found.user.id);
        return Ok(found.user.id);
    }

    let created = store
        .create_user_with_profile(demo_user(), demo_profile())
        .await?;
    info!(
        "Created demo user {} ({}) at {}",
        created.user.name, created.user.id, created.user.company
    );
    Ok(created.user.id)
}

fn demo_user() -> NewUser {
    NewUser {
        name: DEMO_USER_NAME.to_string(),
        role: "Senior Financial Advisor".to_string(),
        company: "Meridian Wealth Partners".to_string(),
        industry: "Financial Services".to_string(),
    }
}

fn demo_profile() -> NewVoiceProfile {
    NewVoiceProfile {
        tone: strings(&["direct", "confident", "empathetic"]),
        sentence_style: "mixed".to_string(),
        vocabulary: "professional".to_string(),
        signature_phrases: strings(&[
            "Here's what most people get wrong:",
            "The math is simple, but the behavior isn't.",
            "I've seen this play out hundreds of times.",
            "Let's be honest about what's really happening here.",
            "The uncomfortable truth is",
        ]),
        topics: strings(&[
            "retirement planning",
            "portfolio diversification",
            "behavioral finance",
            "market volatility",
            "wealth building mindset",
            "financial independence",
        ]),
        avoid: strings(&[
            "synergy",
            "leverage (as a buzzword)",
            "circle back",
            "touch base",
            "at the end of the day",
            "excessive exclamation marks",
            "vague motivational fluff",
        ]),
        raw_summary: "Alex writes with the authority of a practitioner who has seen real \
outcomes, not a theorist. Posts open with a provocative statement or counterintuitive \
observation, then back it with a specific example from client experience, and close by \
giving the reader something actionable."
            .to_string(),
        samples: strings(&[
            "Most investors think diversification means owning a lot of different things. \
It doesn't.\n\nI had a client come to me last year with 12 different mutual funds. He felt \
diversified. On paper, it looked diversified.\n\nEvery single one of those funds had Apple as \
a top-5 holding.\n\nTrue diversification is about correlation, not count. The math is simple, \
but the behavior isn't.\n\nHere's what I tell every new client: own things that go up for \
different reasons.",
            "The market dropped 4% yesterday. My phone hasn't stopped.\n\nMost of the calls \
aren't about the drop. They're about the feeling the drop is creating.\n\nI've seen this play \
out hundreds of times. Fear isn't irrational, it's human. But it is expensive when it drives \
decisions.\n\nThe uncomfortable truth is: your biggest financial risk isn't market volatility. \
It's your own reaction to it.\n\nBuild a plan you can stick to when things feel worst. That's \
the whole game.",
        ]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_seed_creates_profiled_demo_user_once() {
        let store = MemoryStore::new();

        let first = seed_demo_user(&store).await.unwrap();
        let second = seed_demo_user(&store).await.unwrap();

        assert_eq!(first, second);
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, DEMO_USER_NAME);

        let profiled = store.get_user_with_profile(first).await.unwrap().unwrap();
        let profile = profiled.voice_profile.unwrap();
        assert_eq!(profile.samples.len(), 2);
        assert_eq!(profile.signature_phrases.len(), 5);
        assert_eq!(profile.sentence_style, "mixed");
    }

    #[tokio::test]
    async fn test_seed_ignores_same_name_without_profile() {
        let store = MemoryStore::new();
        store.seed_user(DEMO_USER_NAME, "Advisor", "Elsewhere", false);

        let id = seed_demo_user(&store).await.unwrap();

        assert_eq!(store.users().len(), 2);
        let profiled = store.get_user_with_profile(id).await.unwrap().unwrap();
        assert!(profiled.voice_profile.is_some());
    }
}
