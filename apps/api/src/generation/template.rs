//! Stage prompt templates, rendered with Handlebars.
//!
//! Placeholders are plain `{{name}}` expressions. The shared registry runs in
//! strict mode, so a placeholder without a value is an error instead of an
//! empty string, and HTML escaping is off because prompts embed raw HTML.
//! Values are inserted as data and never parsed as template source, so a
//! draft containing `{{x}}` stays literal.

use handlebars::{no_escape, Handlebars};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use thiserror::Error;

static RENDERER: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(no_escape);
    handlebars
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("failed to render template '{template}': {message}")]
    Render {
        template: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    name: &'static str,
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Renders the template. Every placeholder must have a value; extra values are ignored.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        let data: Map<String, Value> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();

        RENDERER
            .render_template(self.source, &Value::Object(data))
            .map_err(|e| TemplateError::Render {
                template: self.name,
                message: e.to_string(),
            })
    }
}
