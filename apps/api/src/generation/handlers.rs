//! Axum route handlers for the content pipelines.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::generation::models::{
    AlternativeProduct, CompetitorEntry, GenerationRequest, LinksData, NewContentResult,
    PipelineStatus, RewriteRequest, RewriteResult,
};
use crate::generation::pipeline::{
    generate_new_content, rewrite_content, ProgressEvent, RecordingProgress,
};
use crate::generation::product::parse_product_json;
use crate::state::AppState;

/// Accepted target lengths, in words.
pub const TARGET_LENGTH_RANGE: RangeInclusive<u32> = 500..=5000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub archetype_code: String,
    /// Raw product feed JSON; aliases are resolved by `parse_product_json`.
    #[serde(default)]
    pub product_data: Option<Value>,
    /// Defaults to the archetype's default length.
    #[serde(default)]
    pub target_length: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub guiding_context: Option<String>,
    #[serde(default)]
    pub links_data: LinksData,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub alternative_product: Option<AlternativeProduct>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub archetype_fields: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RewriteContentRequest {
    pub current_content: String,
    #[serde(default)]
    pub current_structure: Option<String>,
    #[serde(default)]
    pub competitor_data: Vec<CompetitorEntry>,
    #[serde(default)]
    pub archetype_code: Option<String>,
    #[serde(default)]
    pub target_length: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub guiding_context: Option<String>,
    #[serde(default)]
    pub links_data: LinksData,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub alternative_product: Option<AlternativeProduct>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub archetype_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub user_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentResponse {
    pub status: PipelineStatus,
    pub result: NewContentResult,
    pub progress: Vec<ProgressEvent>,
}

#[derive(Debug, Serialize)]
pub struct RewriteContentResponse {
    pub status: PipelineStatus,
    pub result: RewriteResult,
    pub progress: Vec<ProgressEvent>,
}

fn validate_target_length(target_length: u32) -> Result<u32, AppError> {
    if TARGET_LENGTH_RANGE.contains(&target_length) {
        Ok(target_length)
    } else {
        Err(AppError::Validation(format!(
            "target_length must be between {} and {} words",
            TARGET_LENGTH_RANGE.start(),
            TARGET_LENGTH_RANGE.end()
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/content/generate
///
/// Runs draft → critique → final. Stage failures come back with 200 and a
/// non-`complete` status so the caller keeps whatever was produced.
pub async fn handle_generate_content(
    State(state): State<AppState>,
    Json(request): Json<GenerateContentRequest>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    let archetype = state.archetypes.require(&request.archetype_code)?.clone();
    let target_length =
        validate_target_length(request.target_length.unwrap_or(archetype.default_length))?;
    let product_data = request
        .product_data
        .as_ref()
        .filter(|v| !v.is_null())
        .map(parse_product_json)
        .transpose()?;

    let generation = GenerationRequest {
        product_data,
        archetype,
        target_length,
        keywords: request.keywords,
        guiding_context: request.guiding_context,
        links_data: request.links_data,
        objective: request.objective,
        alternative_product: request.alternative_product,
        use_cases: request.use_cases,
        archetype_fields: request.archetype_fields,
    };

    let progress = RecordingProgress::new();
    let result = generate_new_content(
        state.llm.as_ref(),
        &state.budgets,
        &generation,
        Some(&progress),
    )
    .await;
    let status = result.status();
    info!("Generate request finished: run={}, status={:?}", result.run_id, status);

    Ok(Json(GenerateContentResponse {
        status,
        result,
        progress: progress.into_events(),
    }))
}

/// POST /api/v1/content/rewrite
///
/// Runs competitive analysis → rewrite → polish over an existing article.
pub async fn handle_rewrite_content(
    State(state): State<AppState>,
    Json(request): Json<RewriteContentRequest>,
) -> Result<Json<RewriteContentResponse>, AppError> {
    if request.current_content.trim().is_empty() {
        return Err(AppError::Validation(
            "current_content cannot be empty".to_string(),
        ));
    }

    let archetype = request
        .archetype_code
        .as_deref()
        .map(|code| state.archetypes.require(code).cloned())
        .transpose()?;
    let default_length = state
        .archetypes
        .default_length(request.archetype_code.as_deref().unwrap_or_default());
    let target_length = validate_target_length(request.target_length.unwrap_or(default_length))?;

    let rewrite = RewriteRequest {
        current_content: request.current_content,
        current_structure: request.current_structure,
        competitor_data: request.competitor_data,
        archetype,
        target_length,
        keywords: request.keywords,
        guiding_context: request.guiding_context,
        links_data: request.links_data,
        objective: request.objective,
        alternative_product: request.alternative_product,
        use_cases: request.use_cases,
        archetype_fields: request.archetype_fields,
        user_notes: request.user_notes,
    };

    let progress = RecordingProgress::new();
    let result = rewrite_content(
        state.llm.as_ref(),
        &state.budgets,
        &rewrite,
        Some(&progress),
    )
    .await;
    let status = result.status();
    info!("Rewrite request finished: run={}, status={:?}", result.run_id, status);

    Ok(Json(RewriteContentResponse {
        status,
        result,
        progress: progress.into_events(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::archetypes::ArchetypeCatalog;
    use crate::generation::executor::StageBudgets;
    use crate::llm_client::scripted::ScriptedModel;
    use crate::routes::build_router;

    fn app(model: ScriptedModel) -> Router {
        build_router(AppState {
            llm: Arc::new(model),
            archetypes: Arc::new(ArchetypeCatalog::builtin().unwrap()),
            budgets: StageBudgets::default(),
        })
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_validate_target_length() {
        assert!(validate_target_length(500).is_ok());
        assert!(validate_target_length(5000).is_ok());
        assert!(validate_target_length(499).is_err());
        assert!(validate_target_length(5001).is_err());
    }

    #[tokio::test]
    async fn test_generate_complete() {
        let (status, body) = post(
            app(ScriptedModel::replying(&["D1", "C1", "F1"])),
            "/api/v1/content/generate",
            json!({
                "archetype_code": "ARQ-4",
                "keywords": ["portátil gaming"],
                "product_data": {"name": "Portátil Gaming X15", "brand_name": "MSI"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "complete");
        assert_eq!(body["result"]["final_html"], "F1");
        assert_eq!(body["progress"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_generate_partial_result_is_ok() {
        let model = ScriptedModel::new(vec![Ok("D1".to_string()), ScriptedModel::failure()]);
        let (status, body) = post(
            app(model),
            "/api/v1/content/generate",
            json!({"archetype_code": "ARQ-1", "target_length": 1200}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "stage2_failed");
        assert_eq!(body["result"]["draft"], "D1");
        assert!(body["result"]["corrections"].is_null());
        assert_eq!(body["result"]["failure"]["kind"], "transport_failure");
    }

    #[tokio::test]
    async fn test_generate_unknown_archetype_is_404() {
        let (status, body) = post(
            app(ScriptedModel::replying(&[])),
            "/api/v1/content/generate",
            json!({"archetype_code": "ARQ-99"}),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_length() {
        let (status, body) = post(
            app(ScriptedModel::replying(&[])),
            "/api/v1/content/generate",
            json!({"archetype_code": "ARQ-1", "target_length": 100}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_rejects_product_without_title() {
        let (status, _) = post(
            app(ScriptedModel::replying(&[])),
            "/api/v1/content/generate",
            json!({"archetype_code": "ARQ-1", "product_data": {"brand": "MSI"}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rewrite_complete_without_archetype() {
        let (status, body) = post(
            app(ScriptedModel::replying(&["A1", "W1", "F1"])),
            "/api/v1/content/rewrite",
            json!({
                "current_content": "<article><p>Contenido actual</p></article>",
                "keywords": ["monitor 4k"],
                "competitor_data": [{
                    "url": "https://competidor.example/monitores",
                    "content": "Guía completa de monitores 4K con pruebas de laboratorio y comparativas."
                }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "complete");
        assert_eq!(body["result"]["analysis"], "A1");
        assert_eq!(body["result"]["rewritten_draft"], "W1");
    }

    #[tokio::test]
    async fn test_rewrite_requires_current_content() {
        let (status, _) = post(
            app(ScriptedModel::replying(&[])),
            "/api/v1/content/rewrite",
            json!({"current_content": "  "}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
