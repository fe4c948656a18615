use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{EmbeddingError, SimilarityModel};

/// Deterministic word-overlap similarity used when no embedding endpoint is
/// configured. Jaccard overlap `j` in [0, 1] is mapped to `2j - 1` in [-1, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    pub fn jaccard(left: &str, right: &str) -> f64 {
        let left = word_set(left);
        let right = word_set(right);
        let union = left.union(&right).count();
        if union == 0 {
            return 0.0;
        }
        left.intersection(&right).count() as f64 / union as f64
    }
}

#[async_trait]
impl SimilarityModel for LexicalSimilarity {
    async fn similarity(&self, left: &str, right: &str) -> Result<f64, EmbeddingError> {
        if left.trim().is_empty() || right.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(2.0 * Self::jaccard(left, right) - 1.0)
    }

    fn backend(&self) -> &'static str {
        "lexical"
    }
}

fn word_set(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|word| word.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}
