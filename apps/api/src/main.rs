mod archetypes;
mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::archetypes::ArchetypeCatalog;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quill API v{}", env!("CARGO_PKG_VERSION"));

    // Load the archetype catalog (built-in table unless ARCHETYPES_PATH is set)
    let catalog = match &config.archetypes_path {
        Some(path) => ArchetypeCatalog::from_path(path)
            .with_context(|| format!("Failed to load archetypes from {path}"))?,
        None => ArchetypeCatalog::builtin().context("Built-in archetype table is invalid")?,
    };
    info!("Archetype catalog loaded ({} archetypes)", catalog.len());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.model.clone(),
        config.temperature,
    )
    .context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        config.model, config.temperature
    );
    info!("Stage budgets: {:?}", config.budgets);

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        archetypes: Arc::new(catalog),
        budgets: config.budgets,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the CMS host once it is known

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
