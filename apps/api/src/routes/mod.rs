pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::drafts::handlers as drafts;
use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::voice::handlers as voice;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Onboarding
        .route("/api/analyze-voice", post(voice::handle_analyze_voice))
        .route("/api/users", get(voice::handle_list_users))
        // Generation
        .route(
            "/api/generate-draft",
            post(generation::handle_generate_draft),
        )
        .route("/api/cascade", post(generation::handle_cascade))
        .route("/api/cascade/:id", get(generation::handle_get_cascade))
        // Drafts
        .route("/api/drafts/:id", patch(drafts::handle_update_draft))
        .route(
            "/api/users/:id/drafts",
            get(drafts::handle_list_user_drafts),
        )
        .with_state(state)
}

/// CORS for the web client. No configured origins allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
