// Content generation: prompt construction, stage execution, and the two
// three-stage pipelines (new content and rewrite).
// All model calls go through llm_client::TextModel.

pub mod competitors;
pub mod executor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod product;
pub mod prompt_builder;
pub mod prompts;
pub mod template;
