//! Archetype catalog: the static table of SEO content templates.
//!
//! Loaded once at startup, either from the table compiled into the binary
//! or from a JSON file named by `ARCHETYPES_PATH`, then shared read-only.

pub mod handlers;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_TABLE: &str = include_str!("archetypes.json");

pub const DEFAULT_CONTENT_LENGTH: u32 = 1500;
pub const DEFAULT_MIN_LENGTH: u32 = 800;
pub const DEFAULT_MAX_LENGTH: u32 = 2500;

/// Questions that apply to every archetype, appended after its own.
pub const UNIVERSAL_QUESTIONS: &[&str] = &[
    "¿Quién es el lector objetivo y qué necesita resolver?",
    "¿Qué debería hacer el lector después de leer el contenido?",
    "¿Qué diferencia este contenido de lo que ya rankea?",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("failed to read archetype table: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archetype table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("archetype table is empty")]
    Empty,

    #[error("archetype {code} has an invalid length range ({min}..{max}, default {default})")]
    InvalidLengthRange {
        code: String,
        min: u32,
        max: u32,
        default: u32,
    },
}

fn default_length() -> u32 {
    DEFAULT_CONTENT_LENGTH
}

fn default_min_length() -> u32 {
    DEFAULT_MIN_LENGTH
}

fn default_max_length() -> u32 {
    DEFAULT_MAX_LENGTH
}

/// A named SEO content template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeDefinition {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tone: String,
    /// Ordered section outline.
    #[serde(default)]
    pub structure: Vec<String>,
    #[serde(default)]
    pub guiding_questions: Vec<String>,
    #[serde(default = "default_length")]
    pub default_length: u32,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    /// Archetype-specific inputs the form collects (e.g. `nivel_dificultad`).
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub visual_elements: Vec<String>,
}

impl ArchetypeDefinition {
    pub fn length_range(&self) -> (u32, u32) {
        (self.min_length, self.max_length)
    }
}

/// Summary row for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeSummary {
    pub code: String,
    pub name: String,
    pub description: String,
    pub default_length: u32,
}

impl From<&ArchetypeDefinition> for ArchetypeSummary {
    fn from(a: &ArchetypeDefinition) -> Self {
        Self {
            code: a.code.clone(),
            name: a.name.clone(),
            description: a.description.clone(),
            default_length: a.default_length,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    by_code: BTreeMap<String, ArchetypeDefinition>,
}

impl ArchetypeCatalog {
    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses a JSON array of definitions. Later duplicates replace earlier ones.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<ArchetypeDefinition> = serde_json::from_str(raw)?;
        if definitions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_code = BTreeMap::new();
        for definition in definitions {
            let (min, max, default) = (
                definition.min_length,
                definition.max_length,
                definition.default_length,
            );
            if min > max || default < min || default > max {
                return Err(CatalogError::InvalidLengthRange {
                    code: definition.code,
                    min,
                    max,
                    default,
                });
            }
            by_code.insert(definition.code.clone(), definition);
        }
        Ok(Self { by_code })
    }

    pub fn get(&self, code: &str) -> Option<&ArchetypeDefinition> {
        self.by_code.get(code)
    }

    pub fn require(&self, code: &str) -> Result<&ArchetypeDefinition, CatalogError> {
        self.get(code)
            .ok_or_else(|| CatalogError::UnknownArchetype(code.to_string()))
    }

    /// The archetype's own questions, optionally followed by the universal ones.
    /// Unknown codes yield only the universal questions (or nothing).
    pub fn guiding_questions(&self, code: &str, include_universal: bool) -> Vec<String> {
        let mut questions = self
            .get(code)
            .map(|a| a.guiding_questions.clone())
            .unwrap_or_default();
        if include_universal {
            questions.extend(UNIVERSAL_QUESTIONS.iter().map(|q| q.to_string()));
        }
        questions
    }

    pub fn default_length(&self, code: &str) -> u32 {
        self.get(code)
            .map(|a| a.default_length)
            .unwrap_or(DEFAULT_CONTENT_LENGTH)
    }

    pub fn length_range(&self, code: &str) -> (u32, u32) {
        self.get(code)
            .map(ArchetypeDefinition::length_range)
            .unwrap_or((DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH))
    }

    /// All archetypes, ordered by code.
    pub fn list(&self) -> impl Iterator<Item = &ArchetypeDefinition> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table_loads() {
        let catalog = ArchetypeCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 34);

        let guide = catalog.get("ARQ-2").unwrap();
        assert_eq!(guide.name, "Guía Paso a Paso");
        assert_eq!(guide.length_range(), (1200, 3000));
        assert!(!guide.structure.is_empty());
    }

    #[test]
    fn test_lookups_fall_back_for_unknown_codes() {
        let catalog = ArchetypeCatalog::builtin().unwrap();
        assert!(catalog.get("ARQ-99").is_none());
        assert_eq!(catalog.default_length("ARQ-99"), DEFAULT_CONTENT_LENGTH);
        assert_eq!(
            catalog.length_range("ARQ-99"),
            (DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH)
        );
        assert!(matches!(
            catalog.require("ARQ-99"),
            Err(CatalogError::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_guiding_questions_append_universal_ones() {
        let catalog = ArchetypeCatalog::builtin().unwrap();
        let own = catalog.guiding_questions("ARQ-1", false);
        let all = catalog.guiding_questions("ARQ-1", true);

        assert_eq!(all.len(), own.len() + UNIVERSAL_QUESTIONS.len());
        assert_eq!(&all[..own.len()], own.as_slice());
        assert_eq!(all.last().map(String::as_str), UNIVERSAL_QUESTIONS.last().copied());
    }

    #[test]
    fn test_from_path_applies_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"code": "X-1", "name": "Minimal"}}]"#).unwrap();

        let catalog = ArchetypeCatalog::from_path(file.path()).unwrap();
        let minimal = catalog.get("X-1").unwrap();
        assert_eq!(minimal.default_length, DEFAULT_CONTENT_LENGTH);
        assert_eq!(minimal.length_range(), (DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH));
        assert!(minimal.structure.is_empty());
    }

    #[test]
    fn test_rejects_inverted_length_range() {
        let raw = r#"[{"code": "X-1", "name": "Bad", "min_length": 3000, "max_length": 1000, "default_length": 1500}]"#;
        assert!(matches!(
            ArchetypeCatalog::from_json(raw),
            Err(CatalogError::InvalidLengthRange { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            ArchetypeCatalog::from_json("[]"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_list_is_ordered_by_code() {
        let catalog = ArchetypeCatalog::from_json(
            r#"[{"code": "B", "name": "b"}, {"code": "A", "name": "a"}]"#,
        )
        .unwrap();
        let codes: Vec<_> = catalog.list().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }
}
