//! Normalises product JSON from the upstream automation webhook into `ProductData`.
//!
//! The feed is loose: it may arrive wrapped in a one-element array, uses
//! several spellings for the same field, and ships buyer advantages as a
//! single newline-separated string. Everything here is tolerant except the
//! title, which the prompt builders require.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::generation::models::ProductData;

const MAX_ADVANTAGES: usize = 10;
const MAX_DISADVANTAGES: usize = 8;
/// Shorter feedback lines are fragments like "Bueno" and carry no signal.
const MIN_FEEDBACK_CHARS: usize = 8;
const MIN_COMMENT_CHARS: usize = 15;

/// Placeholders the feed uses for "nothing to report".
const EMPTY_MARKERS: &[&str] = &["none", "ninguna", "ninguno", "n/a", "na", "-", "no"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductParseError {
    #[error("expected a JSON object or a non-empty array of objects")]
    InvalidShape,

    #[error("product has no title (expected 'title' or 'name')")]
    MissingTitle,
}

/// Parses one product from a webhook payload.
pub fn parse_product_json(value: &Value) -> Result<ProductData, ProductParseError> {
    let object = match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .first()
            .and_then(Value::as_object)
            .ok_or(ProductParseError::InvalidShape)?,
        _ => return Err(ProductParseError::InvalidShape),
    };

    let title = first_string(object, &["title", "name"]).ok_or(ProductParseError::MissingTitle)?;

    Ok(ProductData {
        product_id: first_string(object, &["product_id", "id", "legacy_id"]),
        title,
        description: first_string(object, &["description"]),
        brand: first_string(object, &["brand_name", "brand"]),
        family: first_string(object, &["family_name", "family"]),
        attributes: parse_attributes(object.get("attributes")),
        total_comments: object
            .get("totalComments")
            .or_else(|| object.get("total_comments"))
            .and_then(as_count)
            .unwrap_or(0),
        advantages: feedback_lines(object.get("advantages"), MAX_ADVANTAGES),
        disadvantages: feedback_lines(object.get("disadvantages"), MAX_DISADVANTAGES),
        user_comments: parse_comments(object.get("comments")),
    })
}

/// First non-blank string (or number) among `keys`, trimmed.
fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts `{"Label": "value"}` or `[{"label"|"key": .., "value": ..}]`.
fn parse_attributes(value: Option<&Value>) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    match value {
        Some(Value::Object(map)) => {
            for (key, raw) in map {
                if let Some(text) = scalar_text(raw).filter(|t| !t.is_empty()) {
                    attributes.insert(key.trim().to_string(), text);
                }
            }
        }
        Some(Value::Array(items)) => {
            for item in items.iter().filter_map(Value::as_object) {
                let label = first_string(item, &["label", "key", "name"]);
                let text = item.get("value").and_then(scalar_text);
                if let (Some(label), Some(text)) = (label, text) {
                    if !text.is_empty() {
                        attributes.insert(label, text);
                    }
                }
            }
        }
        _ => {}
    }
    attributes
}

/// Splits a newline-separated string (or takes an array) into usable feedback items.
fn feedback_lines(value: Option<&Value>, cap: usize) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::String(s)) => s.lines().map(str::to_string).collect(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .filter(|line| line.chars().count() >= MIN_FEEDBACK_CHARS)
        .filter(|line| !is_empty_marker(line))
        .take(cap)
        .collect()
}

fn is_empty_marker(line: &str) -> bool {
    let lowered = line.trim_end_matches('.').to_lowercase();
    EMPTY_MARKERS.contains(&lowered.as_str())
}

/// Accepts `[{"opinion"|"text"|"content": ..}]` or plain strings.
fn parse_comments(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(map) => first_string(map, &["opinion", "text", "content"]),
            _ => None,
        })
        .filter(|comment| comment.chars().count() >= MIN_COMMENT_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_webhook_array_shape() {
        let payload = json!([{
            "product_id": "PC-123",
            "title": "Monitor Gaming 27\" 165Hz",
            "brand_name": "Acme",
            "family_name": "Monitores",
            "attributes": {"Tasa de refresco": "165 Hz", "Panel": "IPS"},
            "totalComments": 42,
            "advantages": "Colores muy vivos\nBuena relación calidad-precio\nOK",
            "disadvantages": "Ninguna\nLa peana se mueve un poco",
            "comments": [
                {"opinion": "Lo uso para jugar y va perfecto, muy fluido"},
                {"opinion": "Genial"}
            ]
        }]);

        let product = parse_product_json(&payload).unwrap();
        assert_eq!(product.product_id.as_deref(), Some("PC-123"));
        assert_eq!(product.brand.as_deref(), Some("Acme"));
        assert_eq!(product.family.as_deref(), Some("Monitores"));
        assert_eq!(product.attributes.get("Panel").map(String::as_str), Some("IPS"));
        assert_eq!(product.total_comments, 42);
        assert_eq!(
            product.advantages,
            vec!["Colores muy vivos", "Buena relación calidad-precio"]
        );
        assert_eq!(product.disadvantages, vec!["La peana se mueve un poco"]);
        assert_eq!(product.user_comments.len(), 1);
        assert!(product.has_user_feedback());
    }

    #[test]
    fn test_aliases_and_attribute_list() {
        let payload = json!({
            "name": "Teclado mecánico",
            "brand": "Keyco",
            "attributes": [
                {"label": "Switches", "value": "Red"},
                {"key": "Layout", "value": "ES"},
                {"label": "Sin valor"}
            ],
            "total_comments": "7"
        });

        let product = parse_product_json(&payload).unwrap();
        assert_eq!(product.title, "Teclado mecánico");
        assert_eq!(product.brand.as_deref(), Some("Keyco"));
        assert_eq!(product.attributes.len(), 2);
        assert_eq!(product.total_comments, 7);
        assert!(!product.has_user_feedback());
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let payload = json!({"brand_name": "Acme", "title": "   "});
        assert_eq!(
            parse_product_json(&payload),
            Err(ProductParseError::MissingTitle)
        );
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        assert_eq!(
            parse_product_json(&json!([])),
            Err(ProductParseError::InvalidShape)
        );
        assert_eq!(
            parse_product_json(&json!("Monitor")),
            Err(ProductParseError::InvalidShape)
        );
    }

    #[test]
    fn test_feedback_is_capped() {
        let advantages: Vec<String> = (0..15).map(|i| format!("Ventaja número {i}")).collect();
        let payload = json!({"title": "Ratón", "advantages": advantages});
        let product = parse_product_json(&payload).unwrap();
        assert_eq!(product.advantages.len(), MAX_ADVANTAGES);
        assert_eq!(product.advantages[0], "Ventaja número 0");
    }
}
