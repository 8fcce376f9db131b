use std::sync::Arc;

use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream completion provider. `None` when no credential is configured;
    /// enhance requests then fail with a configuration error.
    pub llm: Option<Arc<dyn CompletionProvider>>,
}
