use std::sync::Arc;

use crate::archetypes::ArchetypeCatalog;
use crate::generation::executor::StageBudgets;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model boundary. `LlmClient` in production, a scripted double in tests.
    pub llm: Arc<dyn TextModel>,
    /// Read-only after startup.
    pub archetypes: Arc<ArchetypeCatalog>,
    pub budgets: StageBudgets,
}
