//! Competitor normalisation for the rewrite analysis stage.
//!
//! Scraped pages arrive as raw HTML or text of arbitrary size. Before they
//! reach a prompt they are stripped to plain text, whitespace-collapsed,
//! truncated, and filtered so the analysis never sees empty scrapes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::generation::models::CompetitorEntry;

/// Competitors beyond this count are ignored.
pub const MAX_COMPETITORS: usize = 5;
/// Per-competitor character budget inside the analysis prompt.
pub const MAX_CONTENT_CHARS: usize = 3000;
/// Cleaned text shorter than this is treated as a failed scrape.
pub const MIN_CONTENT_CHARS: usize = 50;
pub const TRUNCATION_MARKER: &str = "...[truncated]";

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("HTML tag pattern is valid"));

/// A competitor ready to be embedded in a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCompetitor<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub content: String,
    pub word_count: Option<u32>,
    pub position: Option<u32>,
}

/// Removes tags and collapses whitespace, then truncates to `max_chars` characters.
pub fn clean_content(raw: &str, max_chars: usize) -> String {
    let without_tags = HTML_TAG.replace_all(raw, " ");
    let collapsed = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &collapsed[..cut]),
        None => collapsed,
    }
}

/// Cleans every entry, drops failed scrapes, and keeps the first `MAX_COMPETITORS` survivors.
pub fn prepare_competitors(entries: &[CompetitorEntry]) -> Vec<PreparedCompetitor<'_>> {
    entries
        .iter()
        .filter_map(|entry| {
            let content = clean_content(&entry.content, MAX_CONTENT_CHARS);
            if content.chars().count() < MIN_CONTENT_CHARS {
                return None;
            }
            Some(PreparedCompetitor {
                url: entry.url.as_str(),
                title: entry
                    .title
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or("(untitled)"),
                content,
                word_count: entry.metrics.word_count,
                position: entry.metrics.position,
            })
        })
        .take(MAX_COMPETITORS)
        .collect()
}

/// Renders prepared competitors as numbered prompt sections.
pub fn format_competitor_block(competitors: &[PreparedCompetitor<'_>]) -> String {
    if competitors.is_empty() {
        return "No competitor content is available. Base the analysis on the current article, \
                the keywords and your knowledge of what ranks for this search intent."
            .to_string();
    }

    let mut block = String::new();
    for (i, competitor) in competitors.iter().enumerate() {
        block.push_str(&format!("### COMPETITOR {}\n", i + 1));
        block.push_str(&format!("URL: {}\n", competitor.url));
        block.push_str(&format!("Title: {}\n", competitor.title));
        if let Some(position) = competitor.position {
            block.push_str(&format!("SERP position: {position}\n"));
        }
        if let Some(words) = competitor.word_count {
            block.push_str(&format!("Word count: {words}\n"));
        }
        block.push_str("Content:\n");
        block.push_str(&competitor.content);
        block.push_str("\n\n---\n\n");
    }
    block.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::models::CompetitorMetrics;

    fn entry(url: &str, content: &str) -> CompetitorEntry {
        CompetitorEntry {
            url: url.to_string(),
            title: Some(format!("Title for {url}")),
            content: content.to_string(),
            metrics: CompetitorMetrics::default(),
        }
    }

    fn long_text(words: usize) -> String {
        vec!["palabra"; words].join(" ")
    }

    #[test]
    fn test_clean_content_strips_tags_and_whitespace() {
        let cleaned = clean_content("<h2>Mejores</h2>\n\n<p>monitores   <b>gaming</b></p>", 100);
        assert_eq!(cleaned, "Mejores monitores gaming");
    }

    #[test]
    fn test_clean_content_truncates_on_char_boundary() {
        let cleaned = clean_content(&"ñ".repeat(10), 4);
        assert_eq!(cleaned, format!("ññññ{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_short_scrapes_are_dropped() {
        let entries = vec![
            entry("https://a.example", "<p>Too short</p>"),
            entry("https://b.example", &long_text(20)),
        ];
        let prepared = prepare_competitors(&entries);
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].url, "https://b.example");
    }

    #[test]
    fn test_at_most_five_competitors_are_kept() {
        let entries: Vec<_> = (0..8)
            .map(|i| entry(&format!("https://{i}.example"), &long_text(20)))
            .collect();
        let prepared = prepare_competitors(&entries);
        assert_eq!(prepared.len(), MAX_COMPETITORS);
        assert_eq!(prepared[4].url, "https://4.example");
    }

    #[test]
    fn test_block_numbers_competitors_and_shows_metrics() {
        let mut first = entry("https://a.example", &long_text(20));
        first.metrics.position = Some(2);
        let entries = vec![first, entry("https://b.example", &long_text(20))];
        let block = format_competitor_block(&prepare_competitors(&entries));

        assert!(block.contains("### COMPETITOR 1\nURL: https://a.example"));
        assert!(block.contains("SERP position: 2"));
        assert!(block.contains("### COMPETITOR 2"));
        assert!(!block.contains("COMPETITOR 3"));
    }

    #[test]
    fn test_empty_block_falls_back_to_guidance() {
        let block = format_competitor_block(&[]);
        assert!(block.starts_with("No competitor content is available"));
    }
}
