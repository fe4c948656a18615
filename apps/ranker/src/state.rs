use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::embedding::build_model;
use crate::matching::{MatchEngine, ScoringConfig};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring engine shared by every request. Read-only after start-up.
    pub engine: Arc<MatchEngine>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let engine = build_engine(&config)?;
        Ok(Self { config, engine })
    }
}

/// Builds the engine with the compiled-in scoring constants and the configured
/// similarity backend. Fails if the constants are inconsistent.
pub fn build_engine(config: &Config) -> Result<Arc<MatchEngine>> {
    let model = build_model(config)?;
    let engine = MatchEngine::new(ScoringConfig::default(), model)
        .context("Scoring configuration is invalid")?
        .with_concurrency(config.match_concurrency);
    Ok(Arc::new(engine))
}
