/// HTTP embedding backend.
///
/// Talks to any OpenAI-compatible `/embeddings` endpoint (a hosted API or a
/// local sentence-transformers server). Vectors are cached per text, so a batch
/// against one job embeds the job description once.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cache::EmbeddingCache;
use super::{cosine_similarity, EmbeddingError, SimilarityModel};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbeddingModel {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    cache: Arc<EmbeddingCache>,
}

impl HttpEmbeddingModel {
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
            cache: Arc::new(EmbeddingCache::new()),
        })
    }

    /// Embeds one text, going through the cache.
    pub async fn embed(&self, text: &str) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        self.cache
            .get_or_try_insert(text, || self.request_embedding(text))
            .await
    }

    /// Calls the endpoint. Retries on 429 (rate limit) and 5xx errors with
    /// exponential backoff.
    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.url).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let parsed: EmbeddingResponse = serde_json::from_str(&body)?;
            let vector = parsed
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .filter(|v| !v.is_empty())
                .ok_or(EmbeddingError::EmptyVector)?;

            debug!("Embedding call succeeded: dimensions={}", vector.len());
            return Ok(vector);
        }

        Err(last_error.unwrap_or(EmbeddingError::Api {
            status: 429,
            message: format!("gave up after {MAX_RETRIES} attempts"),
        }))
    }
}

#[async_trait]
impl SimilarityModel for HttpEmbeddingModel {
    async fn similarity(&self, left: &str, right: &str) -> Result<f64, EmbeddingError> {
        let left = self.embed(left).await?;
        let right = self.embed(right).await?;
        cosine_similarity(&left, &right)
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}
