pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::archetypes::handlers as archetypes;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Archetype catalog
        .route("/api/v1/archetypes", get(archetypes::handle_list_archetypes))
        .route(
            "/api/v1/archetypes/:code",
            get(archetypes::handle_get_archetype),
        )
        // Content pipelines
        .route(
            "/api/v1/content/generate",
            post(generation::handle_generate_content),
        )
        .route(
            "/api/v1/content/rewrite",
            post(generation::handle_rewrite_content),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::archetypes::ArchetypeCatalog;
    use crate::generation::executor::StageBudgets;
    use crate::llm_client::scripted::ScriptedModel;

    fn app() -> Router {
        build_router(AppState {
            llm: Arc::new(ScriptedModel::replying(&[])),
            archetypes: Arc::new(ArchetypeCatalog::builtin().unwrap()),
            budgets: StageBudgets::default(),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "quill-api");
    }

    #[tokio::test]
    async fn test_list_archetypes() {
        let (status, body) = get_json("/api/v1/archetypes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["archetypes"].as_array().unwrap().len(), 34);
    }

    #[tokio::test]
    async fn test_get_archetype_includes_universal_questions() {
        let (status, body) = get_json("/api/v1/archetypes/ARQ-2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["archetype"]["code"], "ARQ-2");
        assert_eq!(body["length_range"], serde_json::json!([1200, 3000]));
        let questions = body["guiding_questions"].as_array().unwrap();
        assert_eq!(
            questions.last().and_then(Value::as_str),
            crate::archetypes::UNIVERSAL_QUESTIONS.last().copied()
        );
    }

    #[tokio::test]
    async fn test_get_unknown_archetype_is_404() {
        let (status, body) = get_json("/api/v1/archetypes/ARQ-404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
