// Prompts for voice extraction.

use crate::generation::prompts::PromptPair;
use crate::llm_client::prompts::JSON_ONLY;
use crate::voice::extraction::UserInfo;

/// System prompt for voice analysis. Describes the exact JSON shape expected.
pub const VOICE_ANALYSIS_SYSTEM: &str = r#"You are an expert writing voice analyst. Analyze the provided writing samples and return a JSON object that captures the author's distinctive voice.

Return ONLY valid JSON with exactly this structure:
{
  "tone": ["adjective1", "adjective2", "adjective3"],
  "sentence_style": "short|medium|long|mixed",
  "vocabulary": "conversational|professional|technical",
  "signature_phrases": ["phrase or pattern 1", "phrase or pattern 2"],
  "topics": ["subject area 1", "subject area 2"],
  "avoid": ["word or style to avoid 1", "word or style to avoid 2"],
  "raw_summary": "2-3 sentence plain English description of how this person writes."
}

Guidelines:
- tone: exactly 3 adjectives that capture the emotional quality of the writing
- sentence_style: one of "short", "medium", "long", or "mixed"
- vocabulary: one of "conversational", "professional", or "technical"
- signature_phrases: up to 5 distinctive phrases, sentence openers, or structural patterns this person uses
- topics: subject areas they write about based on the samples
- avoid: words, phrases, or stylistic choices that feel out of character given their samples
- raw_summary: a concise, accurate description of their writing style"#;

/// Builds the voice analysis prompt. `samples` must already be trimmed.
pub fn voice_extraction_prompt(info: &UserInfo, samples: &[String]) -> PromptPair {
    let samples_text = samples
        .iter()
        .enumerate()
        .map(|(i, s)| format!("Sample {}:\n{}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    PromptPair {
        system: format!("{VOICE_ANALYSIS_SYSTEM}\n\n{JSON_ONLY}"),
        user: format!(
            "Analyze the writing voice in these samples from {}, a {} at {} in the {} industry:\n\n{}",
            info.name.trim(),
            info.role.trim(),
            info.company.trim(),
            info.industry.trim(),
            samples_text
        ),
    }
}
