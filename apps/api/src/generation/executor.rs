//! Stage Executor: one model call per stage, normalised to an optional result.
//!
//! Errors stop here. A failed call is logged, recorded as the run's
//! `StageFailure`, and turned into `None`; nothing is retried. The
//! orchestrator decides what an absent stage means.

use std::time::Instant;

use tracing::{error, info};

use crate::generation::models::{FailureKind, StageFailure};
use crate::llm_client::{strip_code_fences, LlmError, TextModel};

/// Per-stage output-token ceilings. Hard limits, not targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageBudgets {
    /// Full-article stages (new draft, rewrite draft).
    pub draft: u32,
    /// New-content critique.
    pub correction: u32,
    /// Rewrite competitive analysis.
    pub analysis: u32,
    /// Final and polish passes.
    pub final_pass: u32,
}

impl Default for StageBudgets {
    fn default() -> Self {
        Self {
            draft: 12_000,
            correction: 4_000,
            analysis: 6_000,
            final_pass: 12_000,
        }
    }
}

/// Runs stages against one model and remembers the first failure.
pub struct StageExecutor<'a> {
    model: &'a dyn TextModel,
    failure: Option<StageFailure>,
}

impl<'a> StageExecutor<'a> {
    pub fn new(model: &'a dyn TextModel) -> Self {
        Self {
            model,
            failure: None,
        }
    }

    /// Invokes the model once. Returns `None` on any failure or on blank output.
    pub async fn run_stage(&mut self, prompt: &str, max_tokens: u32, label: &str) -> Option<String> {
        info!(
            "Stage '{}' starting: model={}, max_tokens={}, prompt_chars={}",
            label,
            self.model.model_id(),
            max_tokens,
            prompt.chars().count()
        );
        let started = Instant::now();

        match self.model.complete(prompt, max_tokens).await {
            Ok(text) => {
                let text = strip_code_fences(&text);
                if text.is_empty() {
                    self.fail(
                        label,
                        FailureKind::EmptyModelOutput,
                        "model returned no text".to_string(),
                    );
                    return None;
                }
                info!(
                    "Stage '{}' completed in {}ms ({} chars)",
                    label,
                    started.elapsed().as_millis(),
                    text.chars().count()
                );
                Some(text.to_string())
            }
            Err(LlmError::EmptyContent) => {
                self.fail(
                    label,
                    FailureKind::EmptyModelOutput,
                    LlmError::EmptyContent.to_string(),
                );
                None
            }
            Err(e) => {
                self.fail(label, FailureKind::TransportFailure, e.to_string());
                None
            }
        }
    }

    /// Records a failure that happened before the model could be called.
    pub fn fail(&mut self, label: &str, kind: FailureKind, message: String) {
        error!("Stage '{}' failed ({:?}): {}", label, kind, message);
        if self.failure.is_none() {
            self.failure = Some(StageFailure {
                stage: label.to_string(),
                kind,
                message,
            });
        }
    }

    pub fn into_failure(self) -> Option<StageFailure> {
        self.failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::ScriptedModel;

    #[tokio::test]
    async fn test_success_returns_text_without_fences() {
        let model = ScriptedModel::replying(&["```html\n<p>D1</p>\n```"]);
        let mut executor = StageExecutor::new(&model);

        let out = executor.run_stage("prompt", 12_000, "Draft").await;
        assert_eq!(out.as_deref(), Some("<p>D1</p>"));
        assert!(executor.into_failure().is_none());
        assert_eq!(model.calls(), vec![("prompt".to_string(), 12_000)]);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_none() {
        let model = ScriptedModel::new(vec![ScriptedModel::failure()]);
        let mut executor = StageExecutor::new(&model);

        assert!(executor.run_stage("prompt", 4_000, "Analysis").await.is_none());
        let failure = executor.into_failure().unwrap();
        assert_eq!(failure.stage, "Analysis");
        assert_eq!(failure.kind, FailureKind::TransportFailure);
        assert!(failure.message.contains("overloaded"));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_output_is_empty_model_output() {
        let model = ScriptedModel::new(vec![Ok("  \n```\n```".to_string())]);
        let mut executor = StageExecutor::new(&model);

        assert!(executor.run_stage("prompt", 4_000, "Final").await.is_none());
        assert_eq!(
            executor.into_failure().map(|f| f.kind),
            Some(FailureKind::EmptyModelOutput)
        );
    }

    #[tokio::test]
    async fn test_first_failure_is_kept() {
        let model = ScriptedModel::new(vec![
            Err(LlmError::EmptyContent),
            ScriptedModel::failure(),
        ]);
        let mut executor = StageExecutor::new(&model);

        executor.run_stage("a", 1, "First").await;
        executor.run_stage("b", 1, "Second").await;
        let failure = executor.into_failure().unwrap();
        assert_eq!(failure.stage, "First");
        assert_eq!(failure.kind, FailureKind::EmptyModelOutput);
    }

    #[test]
    fn test_default_budgets() {
        let budgets = StageBudgets::default();
        assert_eq!(budgets.draft, 12_000);
        assert_eq!(budgets.correction, 4_000);
        assert_eq!(budgets.analysis, 6_000);
        assert_eq!(budgets.final_pass, 12_000);
    }
}
