//! Axum route handlers for archetype lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::archetypes::{ArchetypeDefinition, ArchetypeSummary};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ArchetypeListResponse {
    pub archetypes: Vec<ArchetypeSummary>,
}

#[derive(Debug, Serialize)]
pub struct ArchetypeDetailResponse {
    pub archetype: ArchetypeDefinition,
    /// The archetype's own questions followed by the universal ones.
    pub guiding_questions: Vec<String>,
    /// Accepted `(min, max)` word counts.
    pub length_range: (u32, u32),
}

/// GET /api/v1/archetypes
pub async fn handle_list_archetypes(State(state): State<AppState>) -> Json<ArchetypeListResponse> {
    let archetypes = state.archetypes.list().map(ArchetypeSummary::from).collect();

    Json(ArchetypeListResponse { archetypes })
}

/// GET /api/v1/archetypes/:code
pub async fn handle_get_archetype(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ArchetypeDetailResponse>, AppError> {
    let archetype = state.archetypes.require(&code)?.clone();
    let guiding_questions = state.archetypes.guiding_questions(&code, true);
    let length_range = state.archetypes.length_range(&code);

    Ok(Json(ArchetypeDetailResponse {
        archetype,
        guiding_questions,
        length_range,
    }))
}
