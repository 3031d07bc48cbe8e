use std::str::FromStr;

use anyhow::{Context, Result};

use crate::generation::executor::StageBudgets;

/// Model used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or an optional one does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub model: String,
    pub temperature: f32,
    pub port: u16,
    pub rust_log: String,
    /// JSON file replacing the built-in archetype table.
    pub archetypes_path: Option<String>,
    pub budgets: StageBudgets,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = StageBudgets::default();

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: optional_env("LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            port: optional_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            archetypes_path: std::env::var("ARCHETYPES_PATH").ok(),
            budgets: StageBudgets {
                draft: optional_env("DRAFT_MAX_TOKENS", defaults.draft)?,
                correction: optional_env("CORRECTION_MAX_TOKENS", defaults.correction)?,
                analysis: optional_env("ANALYSIS_MAX_TOKENS", defaults.analysis)?,
                final_pass: optional_env("FINAL_MAX_TOKENS", defaults.final_pass)?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads `key` and parses it, falling back to `default` when unset.
fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_falls_back_when_unset() {
        let value: u32 = optional_env("QUILL_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_optional_env_rejects_garbage() {
        std::env::set_var("QUILL_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = optional_env("QUILL_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("QUILL_TEST_BAD_PORT");
    }

    #[test]
    fn test_optional_env_parses_trimmed_value() {
        std::env::set_var("QUILL_TEST_BUDGET", " 9000 ");
        let value: u32 = optional_env("QUILL_TEST_BUDGET", 1).unwrap();
        assert_eq!(value, 9000);
        std::env::remove_var("QUILL_TEST_BUDGET");
    }
}
