// Voice onboarding: derive a voice profile from writing samples.

pub mod extraction;
pub mod handlers;
pub mod prompts;
