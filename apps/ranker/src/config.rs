use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_EMBEDDING_MODEL: &str = "all-mpnet-base-v2";
const DEFAULT_MATCH_CONCURRENCY: usize = 8;

/// Application configuration loaded from environment variables.
///
/// Only deployment concerns live here. Scoring constants are compiled in
/// (`matching::ScoringConfig`) so results do not drift between environments.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// OpenAI-compatible embeddings endpoint. Unset selects the lexical backend.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    /// Upper bound on resumes scored at once in a batch.
    pub match_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            embedding_api_url: None,
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            match_concurrency: DEFAULT_MATCH_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: optional_env("PORT")
                .map(|port| port.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            match_concurrency: parse_concurrency(optional_env("MATCH_CONCURRENCY").as_deref())?,
        })
    }
}

/// Unset and blank variables both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_concurrency(raw: Option<&str>) -> Result<usize> {
    match raw {
        None => Ok(DEFAULT_MATCH_CONCURRENCY),
        Some(raw) => {
            let value = raw.parse::<usize>().with_context(|| {
                format!("MATCH_CONCURRENCY must be a positive integer, got '{raw}'")
            })?;
            Ok(value.max(1))
        }
    }
}
