use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both handles are created once in `main` and live for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn TextGenerator>,
}
