// Shared prompt fragments.
// Each workflow that needs LLM calls defines its own prompts.rs alongside it.

/// LinkedIn's hard ceiling on post length.
pub const POST_CHARACTER_LIMIT: usize = 3000;

/// Appended to every post-generation instruction.
pub const RAW_POST_ONLY: &str =
    "Return ONLY the post content. No quotes, no title, no explanation.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY: &str = "Return ONLY valid JSON. \
    No markdown, no explanation, no code blocks.";
