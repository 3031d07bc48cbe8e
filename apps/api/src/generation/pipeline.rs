//! Pipeline Orchestrator: the two three-stage flows.
//!
//! New content: draft → critique → final.
//! Rewrite:     competitive analysis → rewrite → polish.
//!
//! Stages run strictly in sequence. Stage n+1 is only invoked when stage n
//! produced text, so the result is always a prefix: once a slot is absent,
//! every later slot is absent too. Neither flow returns an error; failures
//! are recorded on the result and the caller decides whether to re-run.

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::executor::{StageBudgets, StageExecutor};
use crate::generation::models::{
    FailureKind, GenerationRequest, NewContentResult, PipelineStatus, RewriteRequest,
    RewriteResult,
};
use crate::generation::prompt_builder::{
    build_correction_prompt, build_draft_prompt, build_final_prompt,
    build_rewrite_analysis_prompt, build_rewrite_draft_prompt, build_rewrite_final_prompt,
    PromptError,
};
use crate::llm_client::TextModel;

pub const STAGE_DRAFT: &str = "Draft";
pub const STAGE_ANALYSIS: &str = "Analysis";
pub const STAGE_FINAL: &str = "Final";
pub const STAGE_COMPETITIVE_ANALYSIS: &str = "Competitive analysis";
pub const STAGE_REWRITE: &str = "Rewrite";
pub const STAGE_POLISH: &str = "Polish";

// ────────────────────────────────────────────────────────────────────────────
// Progress
// ────────────────────────────────────────────────────────────────────────────

/// Advisory progress telemetry. Reported at 0, 33, 66 and 100 percent.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: u8, label: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, label: &str) {
        self(percent, label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub percent: u8,
    pub label: String,
}

/// Collects progress events so they can be returned with the result.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, percent: u8, label: &str) {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(ProgressEvent {
            percent,
            label: label.to_string(),
        });
    }
}

fn notify(progress: Option<&dyn ProgressSink>, percent: u8, label: &str) {
    if let Some(sink) = progress {
        sink.report(percent, label);
    }
}

/// Runs a stage whose prompt may have failed to build. A build failure is
/// recorded as `MissingRequiredInput` and the model is not called.
async fn run_built(
    executor: &mut StageExecutor<'_>,
    prompt: Result<String, PromptError>,
    max_tokens: u32,
    label: &str,
) -> Option<String> {
    match prompt {
        Ok(prompt) => executor.run_stage(&prompt, max_tokens, label).await,
        Err(e) => {
            executor.fail(label, FailureKind::MissingRequiredInput, e.to_string());
            None
        }
    }
}

fn log_outcome(run_id: Uuid, flow: &str, status: PipelineStatus) {
    match status {
        PipelineStatus::Complete => info!("Run {} ({}) complete", run_id, flow),
        other => warn!("Run {} ({}) halted: {:?}", run_id, flow, other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flows
// ────────────────────────────────────────────────────────────────────────────

/// New-content flow. Returns `(draft, corrections, final)` with failure details.
pub async fn generate_new_content(
    model: &dyn TextModel,
    budgets: &StageBudgets,
    request: &GenerationRequest,
    progress: Option<&dyn ProgressSink>,
) -> NewContentResult {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        "Run {} (new content): archetype={}, target_length={}, keywords={}, links={}, has_product={}",
        run_id,
        request.archetype.code,
        request.target_length,
        request.keywords.len(),
        request.links_data.len(),
        request.product_data.is_some()
    );

    let mut executor = StageExecutor::new(model);

    notify(progress, 0, "Generating draft");
    let draft = run_built(
        &mut executor,
        build_draft_prompt(request),
        budgets.draft,
        STAGE_DRAFT,
    )
    .await;

    let corrections = match draft.as_deref() {
        Some(draft) => {
            notify(progress, 33, "Reviewing draft");
            let prompt = build_correction_prompt(
                draft,
                request.target_length,
                &request.archetype,
                request.objective.as_deref(),
            );
            run_built(&mut executor, prompt, budgets.correction, STAGE_ANALYSIS).await
        }
        None => None,
    };

    let final_html = match (draft.as_deref(), corrections.as_deref()) {
        (Some(draft), Some(corrections)) => {
            notify(progress, 66, "Writing final version");
            let prompt = build_final_prompt(draft, corrections, request.target_length);
            run_built(&mut executor, prompt, budgets.final_pass, STAGE_FINAL).await
        }
        _ => None,
    };

    if final_html.is_some() {
        notify(progress, 100, "Complete");
    }

    let result = NewContentResult {
        run_id,
        draft,
        corrections,
        final_html,
        failure: executor.into_failure(),
        started_at,
        finished_at: Utc::now(),
    };
    log_outcome(run_id, "new content", result.status());
    result
}

/// Rewrite flow. Returns `(analysis, rewritten_draft, final)` with failure details.
pub async fn rewrite_content(
    model: &dyn TextModel,
    budgets: &StageBudgets,
    request: &RewriteRequest,
    progress: Option<&dyn ProgressSink>,
) -> RewriteResult {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        "Run {} (rewrite): archetype={}, target_length={}, competitors={}, content_chars={}",
        run_id,
        request
            .archetype
            .as_ref()
            .map(|a| a.code.as_str())
            .unwrap_or("none"),
        request.target_length,
        request.competitor_data.len(),
        request.current_content.chars().count()
    );

    let mut executor = StageExecutor::new(model);

    notify(progress, 0, "Analysing competitors");
    let analysis = run_built(
        &mut executor,
        build_rewrite_analysis_prompt(request),
        budgets.analysis,
        STAGE_COMPETITIVE_ANALYSIS,
    )
    .await;

    let rewritten_draft = match analysis.as_deref() {
        Some(analysis) => {
            notify(progress, 33, "Rewriting content");
            let prompt = build_rewrite_draft_prompt(request, analysis);
            run_built(&mut executor, prompt, budgets.draft, STAGE_REWRITE).await
        }
        None => None,
    };

    let final_html = match (analysis.as_deref(), rewritten_draft.as_deref()) {
        (Some(analysis), Some(draft)) => {
            notify(progress, 66, "Polishing final version");
            let prompt = build_rewrite_final_prompt(
                draft,
                analysis,
                request.target_length,
                request.objective.as_deref(),
                request.user_notes.as_deref(),
            );
            run_built(&mut executor, prompt, budgets.final_pass, STAGE_POLISH).await
        }
        _ => None,
    };

    if final_html.is_some() {
        notify(progress, 100, "Complete");
    }

    let result = RewriteResult {
        run_id,
        analysis,
        rewritten_draft,
        final_html,
        failure: executor.into_failure(),
        started_at,
        finished_at: Utc::now(),
    };
    log_outcome(run_id, "rewrite", result.status());
    result
}
