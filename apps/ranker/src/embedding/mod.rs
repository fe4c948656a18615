//! Similarity collaborators for the semantic scorer.
//!
//! The matcher only sees [`SimilarityModel`]. Which backend sits behind it is
//! decided once at start-up by [`build_model`] and carried as
//! `Arc<dyn SimilarityModel>`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

pub mod cache;
pub mod client;
pub mod lexical;

pub use client::HttpEmbeddingModel;
pub use lexical::LexicalSimilarity;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("embedding service returned an empty vector")]
    EmptyVector,
}

/// Similarity between two texts, in [-1, 1].
#[async_trait]
pub trait SimilarityModel: Send + Sync {
    async fn similarity(&self, left: &str, right: &str) -> Result<f64, EmbeddingError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Cosine similarity of two dense vectors. Zero-norm vectors have similarity 0.
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f64, EmbeddingError> {
    if left.is_empty() || right.is_empty() {
        return Err(EmbeddingError::EmptyVector);
    }
    if left.len() != right.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut dot = 0.0_f64;
    let mut norm_left = 0.0_f64;
    let mut norm_right = 0.0_f64;
    for (a, b) in left.iter().zip(right) {
        let (a, b) = (f64::from(*a), f64::from(*b));
        dot += a * b;
        norm_left += a * a;
        norm_right += b * b;
    }

    if norm_left == 0.0 || norm_right == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_left.sqrt() * norm_right.sqrt())).clamp(-1.0, 1.0))
}

/// Picks the similarity backend from configuration.
pub fn build_model(config: &Config) -> anyhow::Result<Arc<dyn SimilarityModel>> {
    match &config.embedding_api_url {
        Some(url) => {
            let model = HttpEmbeddingModel::new(
                url.clone(),
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
            )?;
            info!(
                "Similarity backend: embeddings ({} at {url})",
                config.embedding_model
            );
            Ok(Arc::new(model))
        }
        None => {
            info!("Similarity backend: lexical (EMBEDDING_API_URL not set)");
            Ok(Arc::new(LexicalSimilarity))
        }
    }
}
