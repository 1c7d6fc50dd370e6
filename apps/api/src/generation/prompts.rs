//! Prompt Builder for post generation.
//!
//! Pure functions: identical inputs produce byte-identical prompts, and no
//! function here performs I/O. The voice-extraction prompt lives in
//! `voice::prompts`.

use crate::llm_client::prompts::{POST_CHARACTER_LIMIT, RAW_POST_ONLY};
use crate::models::user::{User, VoiceProfile};

/// The two strings a `TextGenerator` call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Prompt for a fresh post about `topic`, optionally drawing on raw notes.
pub fn draft_prompt(
    user: &User,
    profile: &VoiceProfile,
    topic: &str,
    raw_notes: Option<&str>,
) -> PromptPair {
    let system = format!(
        "You are a LinkedIn ghostwriter. Write a LinkedIn post that sounds EXACTLY like \
the person described below. Not generic AI, not a template.

{voice}

RULES:
- Match their sentence rhythm and paragraph length exactly
- Use their vocabulary level, not more formal or more casual
- Pick the signature phrases that fit; do not force all of them in
- Keep the post under {limit} characters (LinkedIn maximum)
- Do NOT add generic calls to action they wouldn't use
- {hashtags}
- Do NOT start with \"I\" or a question unless their samples show that pattern
- Make it feel like this person sat down and wrote it themselves
- {raw_only}",
        voice = voice_block(user, profile),
        limit = POST_CHARACTER_LIMIT,
        hashtags = hashtag_rule(profile),
        raw_only = RAW_POST_ONLY,
    );

    let mut user_instruction = format!("Write a LinkedIn post about: {}", topic.trim());
    if let Some(notes) = raw_notes.map(str::trim).filter(|n| !n.is_empty()) {
        user_instruction.push_str("\n\nRaw notes / bullet points to draw from:\n");
        user_instruction.push_str(notes);
    }

    PromptPair {
        system,
        user: user_instruction,
    }
}

/// Prompt that rewrites a shared master message in one recipient's voice.
pub fn cascade_prompt(user: &User, profile: &VoiceProfile, master_content: &str) -> PromptPair {
    let system = format!(
        "You are a LinkedIn ghostwriter. Adapt the provided master content into a \
personalized LinkedIn post for a specific individual. Keep the core message intact \
but make it sound authentically like this person.

{voice}

RULES:
- Preserve the core message and key points from the master content
- Rewrite it in this person's voice: their sentence rhythm, vocabulary, and patterns
- Add their perspective as a {role} at {company} where natural
- Keep under {limit} characters (LinkedIn maximum)
- Do NOT add calls to action this person wouldn't use
- {hashtags}
- {raw_only}",
        voice = voice_block(user, profile),
        role = user.role,
        company = user.company,
        limit = POST_CHARACTER_LIMIT,
        hashtags = hashtag_rule(profile),
        raw_only = RAW_POST_ONLY,
    );

    PromptPair {
        system,
        user: format!(
            "Adapt this master content into a LinkedIn post:\n\n{}",
            master_content.trim()
        ),
    }
}

/// Renders every profile field, in full and in stored order.
fn voice_block(user: &User, profile: &VoiceProfile) -> String {
    format!(
        "VOICE PROFILE for {name} ({role} at {company}):
- Tone: {tone}
- Sentence style: {sentence_style} sentences
- Vocabulary level: {vocabulary}
- Signature phrases to weave in naturally: {phrases}
- Topics they write about: {topics}
- AVOID these words and styles: {avoid}

How they write: {summary}",
        name = user.name,
        role = user.role,
        company = user.company,
        tone = profile.tone.join(", "),
        sentence_style = profile.sentence_style,
        vocabulary = profile.vocabulary,
        phrases = profile.signature_phrases.join(" | "),
        topics = profile.topics.join(", "),
        avoid = profile.avoid.join(", "),
        summary = profile.raw_summary,
    )
}

fn hashtag_rule(profile: &VoiceProfile) -> &'static str {
    if samples_use_hashtags(&profile.samples) {
        "Use hashtags only the way their samples do"
    } else {
        "Do NOT use hashtags"
    }
}

/// True when any sample contains a `#word` token.
fn samples_use_hashtags(samples: &[String]) -> bool {
    samples.iter().any(|sample| {
        sample.split_whitespace().any(|token| {
            token
                .strip_prefix('#')
                .and_then(|rest| rest.chars().next())
                .is_some_and(char::is_alphanumeric)
        })
    })
}
