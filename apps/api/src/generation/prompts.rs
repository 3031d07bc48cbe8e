// All stage prompt templates for the content pipeline.
// Placeholders are Handlebars `{{name}}` expressions (see template.rs). Single
// braces are plain text, so JSON schemas are written as-is. Cross-cutting
// fragments from llm_client::prompts are passed in as values.

use crate::generation::template::PromptTemplate;

// ────────────────────────────────────────────────────────────────────────────
// New content
// ────────────────────────────────────────────────────────────────────────────

/// Stage 1 of the new-content flow: full first draft.
pub const DRAFT: PromptTemplate = PromptTemplate::new(
    "draft",
    r#"You are a senior SEO copywriter at {{brand}}, the leading tech retailer in Spain.
Write in {{language}}.

# TASK
Write a complete FIRST DRAFT of a "{{archetype_name}}" piece.
{{archetype_description}}

## PARAMETERS
- Primary keyword: {{primary_keyword}}
- Target length: {{target_length}} words (acceptable range: {{min_length}} to {{max_length}} words)
- Content type: {{archetype_name}}
- Archetype tone: {{archetype_tone}}

## KEYWORDS (use all of them naturally, primary keyword density around 1-2%)
{{keyword_list}}

## RECOMMENDED STRUCTURE
{{archetype_structure}}

## CONTENT OBJECTIVE
{{objective}}

## EDITORIAL CONTEXT
{{guiding_context}}

{{optional_sections}}

{{html_structure}}

# BRAND VOICE
{{brand_personality}}

{{anti_ai_phrasing}}

{{feedback_guidance}}

---

{{output_rule}}
The draft MUST land between {{min_length}} and {{max_length}} words."#,
);

/// Stage 2 of the new-content flow: structured critique of the draft.
pub const CORRECTION: PromptTemplate = PromptTemplate::new(
    "correction",
    r#"You are a senior SEO editor at {{brand}}. CRITICALLY REVIEW the draft below.
Write every free-text value in {{language}}.

# DRAFT TO REVIEW

{{draft}}

# REVIEW CRITERIA

## 1. CMS structure
- Does it have the three required articles (main, faqs, verdict)?
- Are the CSS classes exactly right? Is the kicker a <span>? Is the main title an H2?

## 2. Content type: {{archetype_name}}
- Does it follow this structure?
{{archetype_structure}}

## 3. SEO
- Is the primary keyword used naturally, without heading stuffing?
- Are the H3 headings descriptive?

## 4. Content
- Target length is {{target_length}} words (acceptable range: {{min_length}} to {{max_length}}). Estimate the actual count.
- Does it serve the objective: {{objective}}
- Is there redundant or generic filler? Does it sound like {{brand}}?

## 5. UX
- Is there a table of contents, relevant FAQs and a conclusive verdict?

# RESPONSE FORMAT

Return a JSON object with this EXACT schema:
{
  "word_count_actual": 0,
  "word_count_target": {{target_length}},
  "structure_ok": true,
  "issues": [
    {
      "type": "structure|seo|content|ux|tone",
      "severity": "high|medium|low",
      "description": "What is wrong",
      "location": "Where in the draft",
      "fix": "How to fix it"
    }
  ],
  "strengths": ["What already works and must be kept"],
  "overall_score": 0,
  "top_recommendation": "The single most important improvement"
}

{{output_rule}}"#,
);

/// Stage 3 of the new-content flow: apply the critique and produce publishable HTML.
pub const FINAL: PromptTemplate = PromptTemplate::new(
    "final",
    r#"You are a senior SEO editor at {{brand}}. Produce the FINAL VERSION of the content by applying the review below.
Write in {{language}}.

# ORIGINAL DRAFT

{{draft}}

# REVIEW TO APPLY

{{corrections}}

# INSTRUCTIONS

1. Apply EVERY correction in the review.
2. Keep what works: the strengths listed in the review must survive.
3. Adjust the length to {{target_length}} words (acceptable range: {{min_length}} to {{max_length}} words).
4. Verify the CMS structure: three articles (main, faqs, verdict), exact CSS classes, kicker in a <span>, title in an H2.
5. Keep the {{brand}} voice.

{{html_structure}}

---

{{output_rule}}"#,
);

// ────────────────────────────────────────────────────────────────────────────
// Rewrite
// ────────────────────────────────────────────────────────────────────────────

/// Stage 1 of the rewrite flow: compare the current article against ranking competitors.
pub const REWRITE_ANALYSIS: PromptTemplate = PromptTemplate::new(
    "rewrite_analysis",
    r#"You are an SEO strategist and content analyst at {{brand}}.
Analyse our CURRENT ARTICLE against the competitors that rank for the target keywords.
Write every free-text value in {{language}}.

# TARGET KEYWORDS
{{keyword_list}}

# CONTENT TYPE
{{archetype_section}}

# OBJECTIVE
{{objective}}

# TARGET LENGTH
{{target_length}} words

# EDITOR NOTES
{{user_notes}}

# OUR CURRENT ARTICLE

Current structure:
{{current_structure}}

Current HTML:
{{current_content}}

# COMPETITOR CONTENT

{{competitors}}

# RESPONSE FORMAT

Return a JSON object with this EXACT schema:
{
  "competitors_analysed": 0,
  "common_topics": [
    {"topic": "Topic most competitors cover", "depth": "shallow|medium|deep", "covered_by_us": true}
  ],
  "gaps": [
    {"gap": "What we are missing", "priority": "high|medium|low", "how_to_cover": "Concrete approach"}
  ],
  "our_strengths": ["What our article already does better"],
  "our_weaknesses": ["Where our article falls short"],
  "differentiation": [
    {"opportunity": "Angle competitors miss", "value_for_reader": "Why it matters"}
  ],
  "recommended_structure": ["Ordered list of sections the rewrite should have"],
  "length": {"competitor_average_words": 0, "recommendation": "Is {{target_length}} words adequate, short or long?"}
}

Identify the 3-5 most important gaps. Be specific and propose actions, not descriptions.

{{output_rule}}"#,
);

/// Stage 2 of the rewrite flow: rewrite constrained by the analysis.
pub const REWRITE_DRAFT: PromptTemplate = PromptTemplate::new(
    "rewrite_draft",
    r#"You are a senior SEO copywriter at {{brand}}. REWRITE the current article so it beats the competition.
Write in {{language}}.

# CURRENT ARTICLE

{{current_content}}

# COMPETITIVE ANALYSIS (apply it)

{{analysis}}

# PARAMETERS
- Target length: {{target_length}} words (acceptable range: {{min_length}} to {{max_length}} words)

## CONTENT TYPE
{{archetype_section}}

## KEYWORDS (use all of them naturally)
{{keyword_list}}

## CONTENT OBJECTIVE
{{objective}}

## EDITORIAL CONTEXT
{{guiding_context}}

## EDITOR NOTES
{{user_notes}}

{{optional_sections}}

# REWRITE RULES
1. Close every high-priority gap from the analysis.
2. Keep the parts of the current article that already work, including accurate facts and valid links.
3. Follow the recommended structure unless the content type dictates otherwise.
4. Do not invent specifications, prices or figures.

{{html_structure}}

# BRAND VOICE
{{brand_personality}}

{{anti_ai_phrasing}}

---

{{output_rule}}"#,
);

/// Stage 3 of the rewrite flow: polish pass.
pub const REWRITE_FINAL: PromptTemplate = PromptTemplate::new(
    "rewrite_final",
    r#"You are a senior SEO editor at {{brand}}. POLISH the rewritten article below into its final version.
Write in {{language}}.

# REWRITTEN DRAFT

{{draft}}

# COMPETITIVE ANALYSIS IT MUST SATISFY

{{analysis}}

# CHECKLIST
1. Every high-priority gap in the analysis is covered.
2. Length is {{target_length}} words (acceptable range: {{min_length}} to {{max_length}} words).
3. The objective is met: {{objective}}
4. Editor notes are honoured: {{user_notes}}
5. CMS structure is intact: three articles (main, faqs, verdict), exact CSS classes, kicker in a <span>, title in an H2.
6. No AI-sounding filler, no repeated paragraph openers, and the verdict adds value.

{{html_structure}}

---

{{output_rule}}"#,
);
