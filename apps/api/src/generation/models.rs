//! Request and result types for the content pipeline.
//!
//! Optional inputs are modelled as `Option` or empty collections. Prompt
//! builders branch on which of them are present and never probe for fields
//! at runtime.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::archetypes::ArchetypeDefinition;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Product facts from the upstream feed. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(default)]
    pub product_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub total_comments: u32,
    #[serde(default)]
    pub advantages: Vec<String>,
    #[serde(default)]
    pub disadvantages: Vec<String>,
    #[serde(default)]
    pub user_comments: Vec<String>,
}

impl ProductData {
    /// True when buyers left advantages, disadvantages or comments.
    pub fn has_user_feedback(&self) -> bool {
        !self.advantages.is_empty()
            || !self.disadvantages.is_empty()
            || !self.user_comments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLink {
    pub url: String,
    pub anchor: String,
    #[serde(default)]
    pub product: Option<ProductData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostLink {
    pub url: String,
    pub anchor: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Category or listing page. The CMS renders separate blocks above and below the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingLink {
    pub url: String,
    pub anchor: String,
    #[serde(default)]
    pub top_html: Option<String>,
    #[serde(default)]
    pub bottom_html: Option<String>,
}

/// Internal links to weave into the article, grouped by destination type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksData {
    #[serde(default)]
    pub products: Vec<ProductLink>,
    #[serde(default)]
    pub posts: Vec<PostLink>,
    #[serde(default)]
    pub listings: Vec<ListingLink>,
}

impl LinksData {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.posts.is_empty() && self.listings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len() + self.posts.len() + self.listings.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeProduct {
    pub url: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorMetrics {
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub monthly_traffic: Option<u32>,
}

/// One ranking page, already scraped by the keyword-research integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metrics: CompetitorMetrics,
}

/// New-content mode input.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub product_data: Option<ProductData>,
    pub archetype: ArchetypeDefinition,
    /// Target length in words.
    pub target_length: u32,
    /// Ordered; the first entry is the primary keyword.
    pub keywords: Vec<String>,
    pub guiding_context: Option<String>,
    pub links_data: LinksData,
    pub objective: Option<String>,
    pub alternative_product: Option<AlternativeProduct>,
    pub use_cases: Vec<String>,
    pub archetype_fields: BTreeMap<String, String>,
}

/// Rewrite mode input.
#[derive(Debug, Clone)]
pub struct RewriteRequest {
    /// Existing article HTML.
    pub current_content: String,
    pub current_structure: Option<String>,
    pub competitor_data: Vec<CompetitorEntry>,
    pub archetype: Option<ArchetypeDefinition>,
    pub target_length: u32,
    pub keywords: Vec<String>,
    pub guiding_context: Option<String>,
    pub links_data: LinksData,
    pub objective: Option<String>,
    pub alternative_product: Option<AlternativeProduct>,
    pub use_cases: Vec<String>,
    pub archetype_fields: BTreeMap<String, String>,
    pub user_notes: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, timeout, auth or API error from the model boundary.
    TransportFailure,
    /// The call succeeded but returned no usable text.
    EmptyModelOutput,
    /// A builder precondition did not hold, so the stage was never called.
    MissingRequiredInput,
}

/// Why a run halted, and at which stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Stage1Failed,
    Stage2Failed,
    Stage3Failed,
    Complete,
}

impl PipelineStatus {
    fn from_slots(first: bool, second: bool, third: bool) -> Self {
        match (first, second, third) {
            (false, _, _) => PipelineStatus::Stage1Failed,
            (true, false, _) => PipelineStatus::Stage2Failed,
            (true, true, false) => PipelineStatus::Stage3Failed,
            (true, true, true) => PipelineStatus::Complete,
        }
    }
}

/// New-content outcome: `(draft, corrections, final)`.
///
/// A later slot is only ever present when every earlier slot is.
#[derive(Debug, Clone, Serialize)]
pub struct NewContentResult {
    pub run_id: Uuid,
    pub draft: Option<String>,
    /// Critique text. Requested as JSON but passed through uninterpreted.
    pub corrections: Option<String>,
    pub final_html: Option<String>,
    pub failure: Option<StageFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl NewContentResult {
    pub fn status(&self) -> PipelineStatus {
        PipelineStatus::from_slots(
            self.draft.is_some(),
            self.corrections.is_some(),
            self.final_html.is_some(),
        )
    }

    pub fn into_tuple(self) -> (Option<String>, Option<String>, Option<String>) {
        (self.draft, self.corrections, self.final_html)
    }
}

/// Rewrite outcome: `(analysis, rewritten_draft, final)`.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResult {
    pub run_id: Uuid,
    /// Competitive analysis text, passed through uninterpreted.
    pub analysis: Option<String>,
    pub rewritten_draft: Option<String>,
    pub final_html: Option<String>,
    pub failure: Option<StageFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RewriteResult {
    pub fn status(&self) -> PipelineStatus {
        PipelineStatus::from_slots(
            self.analysis.is_some(),
            self.rewritten_draft.is_some(),
            self.final_html.is_some(),
        )
    }

    pub fn into_tuple(self) -> (Option<String>, Option<String>, Option<String>) {
        (self.analysis, self.rewritten_draft, self.final_html)
    }
}
