// Post generation: prompt construction, single drafts, and cascades.
// All LLM calls go through llm_client, never the Anthropic API directly.

pub mod cascade;
pub mod draft;
pub mod handlers;
pub mod prompts;
