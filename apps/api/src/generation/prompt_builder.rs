//! Prompt Builder: pure functions from request data to one prompt per stage.
//!
//! Builders have no side effects and never call the model. Optional inputs
//! that are absent switch to generic guidance instead of leaving empty
//! sections behind. Only a violated precondition produces an error:
//! - `target_length` must be positive
//! - a supplied product must have a non-blank title
//! - rewrite needs non-blank current content
//! - later stages need non-blank earlier-stage output
//!
//! Earlier-stage output is embedded verbatim, never truncated.

use thiserror::Error;

use crate::archetypes::ArchetypeDefinition;
use crate::generation::competitors::{clean_content, format_competitor_block, prepare_competitors};
use crate::generation::models::{
    AlternativeProduct, GenerationRequest, LinksData, ProductData, RewriteRequest,
};
use crate::generation::prompts::{
    CORRECTION, DRAFT, FINAL, REWRITE_ANALYSIS, REWRITE_DRAFT, REWRITE_FINAL,
};
use crate::generation::template::TemplateError;
use crate::llm_client::prompts::{
    ANTI_AI_PHRASING, BRAND_NAME, BRAND_PERSONALITY, CMS_HTML_STRUCTURE, CONTENT_LANGUAGE,
    HTML_ONLY_OUTPUT, JSON_ONLY_OUTPUT, SPEC_TRANSLATION, WITHOUT_USER_FEEDBACK,
    WITH_USER_FEEDBACK,
};

const MAX_PROMPT_ATTRIBUTES: usize = 8;
const MAX_PROMPT_ADVANTAGES: usize = 8;
const MAX_PROMPT_DISADVANTAGES: usize = 5;
const MAX_PROMPT_COMMENTS: usize = 3;
const MAX_COMMENT_CHARS: usize = 250;
const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_LISTING_COPY_CHARS: usize = 300;

const DEFAULT_OBJECTIVE: &str = "Create useful, complete content that answers the reader's \
    search intent and helps them make an informed decision.";
const NO_GUIDING_CONTEXT: &str = "No additional editorial context was supplied.";
const NO_USER_NOTES: &str = "None.";
const NO_KEYWORDS: &str = "No keywords were supplied. Infer the search intent from the content \
    type and the objective, and use the natural vocabulary of that intent.";
const NO_STRUCTURE: &str = "Use a logical structure appropriate for this content type.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

// ────────────────────────────────────────────────────────────────────────────
// Length window
// ────────────────────────────────────────────────────────────────────────────

/// Acceptable word-count window around a target: ±5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthWindow {
    pub target: u32,
    pub min: u32,
    pub max: u32,
}

impl LengthWindow {
    pub fn new(target: u32) -> Result<Self, PromptError> {
        if target == 0 {
            return Err(PromptError::MissingRequiredInput(
                "target_length must be greater than zero".to_string(),
            ));
        }
        let target64 = u64::from(target);
        let min = u32::try_from(target64 * 95 / 100).unwrap_or(target);
        let max = u32::try_from(target64 * 105 / 100).unwrap_or(u32::MAX);
        Ok(Self { target, min, max })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// New content
// ────────────────────────────────────────────────────────────────────────────

/// Stage 1 prompt: full first draft.
pub fn build_draft_prompt(request: &GenerationRequest) -> Result<String, PromptError> {
    let window = LengthWindow::new(request.target_length)?;
    if let Some(product) = &request.product_data {
        require_text("product_data.title", &product.title)?;
    }

    let archetype = &request.archetype;
    let target = window.target.to_string();
    let min = window.min.to_string();
    let max = window.max.to_string();

    let mut optional_sections = Vec::new();
    if let Some(section) = archetype_fields_section(&request.archetype_fields) {
        optional_sections.push(section);
    }
    if let Some(section) = use_cases_section(&request.use_cases) {
        optional_sections.push(section);
    }
    if let Some(product) = &request.product_data {
        optional_sections.push(product_section(product));
    }
    optional_sections.push(links_section(&request.links_data));
    if let Some(section) = product_fit_section(
        request.product_data.as_ref(),
        request.alternative_product.as_ref(),
    ) {
        optional_sections.push(section);
    }

    let prompt = DRAFT.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("archetype_name", archetype.name.as_str()),
        ("archetype_description", archetype.description.as_str()),
        ("archetype_tone", or_fallback(&archetype.tone, "Brand default")),
        ("archetype_structure", structure_list(&archetype.structure).as_str()),
        ("primary_keyword", primary_keyword(&request.keywords)),
        ("keyword_list", keyword_list(&request.keywords).as_str()),
        ("target_length", target.as_str()),
        ("min_length", min.as_str()),
        ("max_length", max.as_str()),
        ("objective", optional_text(request.objective.as_deref(), DEFAULT_OBJECTIVE)),
        (
            "guiding_context",
            optional_text(request.guiding_context.as_deref(), NO_GUIDING_CONTEXT),
        ),
        ("optional_sections", optional_sections.join("\n\n").as_str()),
        ("html_structure", CMS_HTML_STRUCTURE),
        ("brand_personality", BRAND_PERSONALITY),
        ("anti_ai_phrasing", ANTI_AI_PHRASING),
        ("feedback_guidance", feedback_guidance(request.product_data.as_ref()).as_str()),
        ("output_rule", HTML_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

/// Stage 2 prompt: JSON critique of the draft. The critique is never parsed here.
pub fn build_correction_prompt(
    draft: &str,
    target_length: u32,
    archetype: &ArchetypeDefinition,
    objective: Option<&str>,
) -> Result<String, PromptError> {
    let window = LengthWindow::new(target_length)?;
    require_text("draft", draft)?;

    let target = window.target.to_string();
    let min = window.min.to_string();
    let max = window.max.to_string();

    let prompt = CORRECTION.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("draft", draft),
        ("archetype_name", archetype.name.as_str()),
        ("archetype_structure", structure_list(&archetype.structure).as_str()),
        ("target_length", target.as_str()),
        ("min_length", min.as_str()),
        ("max_length", max.as_str()),
        ("objective", optional_text(objective, DEFAULT_OBJECTIVE)),
        ("output_rule", JSON_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

/// Stage 3 prompt: merge the draft and its critique into a final revision.
pub fn build_final_prompt(
    draft: &str,
    corrections: &str,
    target_length: u32,
) -> Result<String, PromptError> {
    let window = LengthWindow::new(target_length)?;
    require_text("draft", draft)?;
    require_text("corrections", corrections)?;

    let target = window.target.to_string();
    let min = window.min.to_string();
    let max = window.max.to_string();

    let prompt = FINAL.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("draft", draft),
        ("corrections", corrections),
        ("target_length", target.as_str()),
        ("min_length", min.as_str()),
        ("max_length", max.as_str()),
        ("html_structure", CMS_HTML_STRUCTURE),
        ("output_rule", HTML_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

// ────────────────────────────────────────────────────────────────────────────
// Rewrite
// ────────────────────────────────────────────────────────────────────────────

/// Rewrite stage 1 prompt: competitive analysis of the current article.
pub fn build_rewrite_analysis_prompt(request: &RewriteRequest) -> Result<String, PromptError> {
    let window = LengthWindow::new(request.target_length)?;
    require_text("current_content", request.current_content.as_str())?;

    let competitors = format_competitor_block(&prepare_competitors(&request.competitor_data));
    let target = window.target.to_string();

    let prompt = REWRITE_ANALYSIS.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("keyword_list", keyword_list(&request.keywords).as_str()),
        ("archetype_section", archetype_section(request.archetype.as_ref()).as_str()),
        ("objective", optional_text(request.objective.as_deref(), DEFAULT_OBJECTIVE)),
        ("target_length", target.as_str()),
        ("user_notes", optional_text(request.user_notes.as_deref(), NO_USER_NOTES)),
        (
            "current_structure",
            optional_text(
                request.current_structure.as_deref(),
                "Not provided. Infer it from the headings in the HTML.",
            ),
        ),
        ("current_content", request.current_content.as_str()),
        ("competitors", competitors.as_str()),
        ("output_rule", JSON_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

/// Rewrite stage 2 prompt: rewrite the current article under the analysis.
pub fn build_rewrite_draft_prompt(
    request: &RewriteRequest,
    analysis: &str,
) -> Result<String, PromptError> {
    let window = LengthWindow::new(request.target_length)?;
    require_text("current_content", request.current_content.as_str())?;
    require_text("analysis", analysis)?;

    let target = window.target.to_string();
    let min = window.min.to_string();
    let max = window.max.to_string();

    let mut optional_sections = Vec::new();
    if let Some(section) = archetype_fields_section(&request.archetype_fields) {
        optional_sections.push(section);
    }
    if let Some(section) = use_cases_section(&request.use_cases) {
        optional_sections.push(section);
    }
    optional_sections.push(links_section(&request.links_data));
    if let Some(section) = product_fit_section(None, request.alternative_product.as_ref()) {
        optional_sections.push(section);
    }

    let prompt = REWRITE_DRAFT.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("current_content", request.current_content.as_str()),
        ("analysis", analysis),
        ("target_length", target.as_str()),
        ("min_length", min.as_str()),
        ("max_length", max.as_str()),
        ("archetype_section", archetype_section(request.archetype.as_ref()).as_str()),
        ("keyword_list", keyword_list(&request.keywords).as_str()),
        ("objective", optional_text(request.objective.as_deref(), DEFAULT_OBJECTIVE)),
        (
            "guiding_context",
            optional_text(request.guiding_context.as_deref(), NO_GUIDING_CONTEXT),
        ),
        ("user_notes", optional_text(request.user_notes.as_deref(), NO_USER_NOTES)),
        ("optional_sections", optional_sections.join("\n\n").as_str()),
        ("html_structure", CMS_HTML_STRUCTURE),
        ("brand_personality", BRAND_PERSONALITY),
        ("anti_ai_phrasing", ANTI_AI_PHRASING),
        ("output_rule", HTML_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

/// Rewrite stage 3 prompt: polish pass.
pub fn build_rewrite_final_prompt(
    rewritten_draft: &str,
    analysis: &str,
    target_length: u32,
    objective: Option<&str>,
    user_notes: Option<&str>,
) -> Result<String, PromptError> {
    let window = LengthWindow::new(target_length)?;
    require_text("rewritten_draft", rewritten_draft)?;
    require_text("analysis", analysis)?;

    let target = window.target.to_string();
    let min = window.min.to_string();
    let max = window.max.to_string();

    let prompt = REWRITE_FINAL.render(&[
        ("brand", BRAND_NAME),
        ("language", CONTENT_LANGUAGE),
        ("draft", rewritten_draft),
        ("analysis", analysis),
        ("target_length", target.as_str()),
        ("min_length", min.as_str()),
        ("max_length", max.as_str()),
        ("objective", optional_text(objective, DEFAULT_OBJECTIVE)),
        ("user_notes", optional_text(user_notes, NO_USER_NOTES)),
        ("html_structure", CMS_HTML_STRUCTURE),
        ("output_rule", HTML_ONLY_OUTPUT),
    ])?;
    Ok(prompt)
}

// ────────────────────────────────────────────────────────────────────────────
// Section helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_text(field: &str, value: &str) -> Result<(), PromptError> {
    if value.trim().is_empty() {
        return Err(PromptError::MissingRequiredInput(format!("{field} is empty")));
    }
    Ok(())
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn optional_text<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.map(|v| or_fallback(v, fallback)).unwrap_or(fallback)
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn primary_keyword(keywords: &[String]) -> &str {
    non_blank(keywords)
        .next()
        .unwrap_or("(none supplied; infer it from the objective)")
}

fn keyword_list(keywords: &[String]) -> String {
    let lines: Vec<String> = non_blank(keywords)
        .enumerate()
        .map(|(i, kw)| {
            if i == 0 {
                format!("- {kw} (primary)")
            } else {
                format!("- {kw}")
            }
        })
        .collect();
    if lines.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        lines.join("\n")
    }
}

fn structure_list(structure: &[String]) -> String {
    let lines: Vec<String> = non_blank(structure)
        .enumerate()
        .map(|(i, section)| format!("{}. {section}", i + 1))
        .collect();
    if lines.is_empty() {
        NO_STRUCTURE.to_string()
    } else {
        lines.join("\n")
    }
}

fn archetype_section(archetype: Option<&ArchetypeDefinition>) -> String {
    let Some(archetype) = archetype else {
        return "No specific content type was selected. Keep the current format of the article \
                and improve it."
            .to_string();
    };

    let mut section = format!("{} ({})", archetype.name, archetype.code);
    if !archetype.description.trim().is_empty() {
        section.push_str(&format!("\n{}", archetype.description.trim()));
    }
    if !archetype.tone.trim().is_empty() {
        section.push_str(&format!("\nTone: {}", archetype.tone.trim()));
    }
    section.push_str("\nRecommended structure:\n");
    section.push_str(&structure_list(&archetype.structure));
    section
}

fn archetype_fields_section(
    fields: &std::collections::BTreeMap<String, String>,
) -> Option<String> {
    let lines: Vec<String> = fields
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("- {}: {}", key.replace('_', " "), value.trim()))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "## CONTENT-TYPE SPECIFIC INPUTS\n{}",
        lines.join("\n")
    ))
}

fn use_cases_section(use_cases: &[String]) -> Option<String> {
    let lines: Vec<String> = non_blank(use_cases).map(|uc| format!("- {uc}")).collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "## USE CASES TO COVER\nAddress each of these explicitly:\n{}",
        lines.join("\n")
    ))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Product facts for the draft. Feedback sub-sections only appear when populated.
fn product_section(product: &ProductData) -> String {
    let mut lines = vec!["## PRODUCT DATA".to_string()];
    lines.push(format!("- Title: {}", product.title.trim()));
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(format!("- Brand: {}", brand.trim()));
    }
    if let Some(family) = product.family.as_deref().filter(|f| !f.trim().is_empty()) {
        lines.push(format!("- Family: {}", family.trim()));
    }
    if let Some(description) = product
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
    {
        let plain = clean_content(description, MAX_DESCRIPTION_CHARS);
        lines.push(format!("- Description: {plain}"));
    }
    if product.total_comments > 0 {
        lines.push(format!("- Buyer reviews: {}", product.total_comments));
    }

    if !product.attributes.is_empty() {
        lines.push(String::new());
        lines.push("### Key specifications".to_string());
        for (label, value) in product.attributes.iter().take(MAX_PROMPT_ATTRIBUTES) {
            lines.push(format!("- {label}: {value}"));
        }
        let hidden = product.attributes.len().saturating_sub(MAX_PROMPT_ATTRIBUTES);
        if hidden > 0 {
            lines.push(format!("- (+{hidden} more)"));
        }
    }

    if !product.advantages.is_empty() {
        lines.push(String::new());
        lines.push("### What buyers like".to_string());
        for advantage in product.advantages.iter().take(MAX_PROMPT_ADVANTAGES) {
            lines.push(format!("- {advantage}"));
        }
    }

    if !product.disadvantages.is_empty() {
        lines.push(String::new());
        lines.push("### What buyers point out".to_string());
        for disadvantage in product.disadvantages.iter().take(MAX_PROMPT_DISADVANTAGES) {
            lines.push(format!("- {disadvantage}"));
        }
    }

    if !product.user_comments.is_empty() {
        lines.push(String::new());
        lines.push("### Buyer opinions".to_string());
        for comment in product.user_comments.iter().take(MAX_PROMPT_COMMENTS) {
            lines.push(format!("- \"{}\"", truncate_chars(comment.trim(), MAX_COMMENT_CHARS)));
        }
    }

    lines.join("\n")
}

/// Short product summary attached to a product link.
fn linked_product_summary(product: &ProductData) -> String {
    let mut parts = vec![product.title.trim().to_string()];
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.trim().is_empty()) {
        parts.push(brand.trim().to_string());
    }
    let specs: Vec<String> = product
        .attributes
        .iter()
        .take(3)
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    if !specs.is_empty() {
        parts.push(specs.join(", "));
    }
    if let Some(advantage) = product.advantages.first() {
        parts.push(format!("buyers like: {advantage}"));
    }
    parts.join(" | ")
}

/// `<a>` tag for a supplied link. Quotes in the URL and angle brackets in the
/// text are escaped so the tag stays well-formed.
fn anchor(url: &str, text: &str) -> String {
    let url = url.replace('"', "&quot;");
    let text = text.replace('<', "&lt;").replace('>', "&gt;");
    format!("<a href=\"{url}\">{text}</a>")
}

/// Internal links grouped by destination. Never empty: says so when there are none.
fn links_section(links: &LinksData) -> String {
    if links.is_empty() {
        return "## INTERNAL LINKS\nNo internal links were supplied. Do not invent URLs."
            .to_string();
    }

    let mut lines = vec![
        "## INTERNAL LINKS".to_string(),
        "Include EVERY link below exactly once, with the exact anchor text, where it fits the \
         context naturally."
            .to_string(),
    ];

    if !links.posts.is_empty() {
        lines.push(String::new());
        lines.push("### Blog posts".to_string());
        for post in &links.posts {
            let mut line = format!("- {}", anchor(&post.url, &post.anchor));
            if let Some(context) = post.context.as_deref().filter(|c| !c.trim().is_empty()) {
                line.push_str(&format!(" (context: {})", context.trim()));
            }
            lines.push(line);
        }
    }

    if !links.listings.is_empty() {
        lines.push(String::new());
        lines.push("### Category listings".to_string());
        for listing in &links.listings {
            lines.push(format!("- {}", anchor(&listing.url, &listing.anchor)));
            if let Some(top) = listing.top_html.as_deref().filter(|h| !h.trim().is_empty()) {
                lines.push(format!(
                    "  Listing intro: {}",
                    clean_content(top, MAX_LISTING_COPY_CHARS)
                ));
            }
            if let Some(bottom) = listing
                .bottom_html
                .as_deref()
                .filter(|h| !h.trim().is_empty())
            {
                lines.push(format!(
                    "  Listing footer copy: {}",
                    clean_content(bottom, MAX_LISTING_COPY_CHARS)
                ));
            }
        }
    }

    if !links.products.is_empty() {
        lines.push(String::new());
        lines.push("### Product pages".to_string());
        for link in &links.products {
            let mut line = format!("- {}", anchor(&link.url, &link.anchor));
            if let Some(product) = &link.product {
                line.push_str(&format!(" ({})", linked_product_summary(product)));
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Closing fit block. "Perfect if" needs a product; "Consider alternatives if" needs an alternative.
fn product_fit_section(
    product: Option<&ProductData>,
    alternative: Option<&AlternativeProduct>,
) -> Option<String> {
    let alternative = alternative.filter(|a| !a.url.trim().is_empty());
    match (product, alternative) {
        (None, None) => None,
        (_, None) => Some(
            "## PRODUCT FIT\nBefore the verdict, add a short \"Perfect if:\" list describing the \
             buyer this product suits best."
                .to_string(),
        ),
        (_, Some(alt)) => {
            let text = alt
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("this alternative");
            Some(format!(
                "## PRODUCT FIT\nBefore the verdict, add a short \"Perfect if:\" list describing \
                 the buyer this product suits best, followed by a \"Consider alternatives if:\" \
                 list that links to {}.",
                anchor(alt.url.trim(), text.trim())
            ))
        }
    }
}

/// Brand guidance branch: real buyer feedback, or generic guidance when there is none.
fn feedback_guidance(product: Option<&ProductData>) -> String {
    let mut blocks = Vec::new();
    match product {
        Some(p) if p.has_user_feedback() => blocks.push(WITH_USER_FEEDBACK),
        _ => blocks.push(WITHOUT_USER_FEEDBACK),
    }
    if product.is_some_and(|p| !p.attributes.is_empty()) {
        blocks.push(SPEC_TRANSLATION);
    }
    blocks.join("\n\n")
}
