pub mod api;
pub mod cohort;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod roster;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::{Config, ConfigError};
use crate::pipeline::llm::{FallbackChain, LlmError};
use crate::roster::RosterError;

/// Startup failures, one variant per subsystem.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Startup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub async fn run() -> Result<(), RunError> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::from_env()?;
    let roster = roster::load_roster(&config.data_dir)?;

    // Blocking HTTP clients must be built off the async runtime.
    let chain_config = config.clone();
    let chain =
        tokio::task::spawn_blocking(move || FallbackChain::from_config(&chain_config)).await??;
    tracing::info!(providers = ?chain.provider_names(), "LLM provider chain ready");

    api::serve(config.bind_addr, ApiContext::new(roster, chain)).await?;
    Ok(())
}
