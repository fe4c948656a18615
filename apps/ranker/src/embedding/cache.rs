use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<Vec<f32>>>>;

/// Get-or-compute cache of embedding vectors keyed by whitespace-normalized text.
///
/// Concurrent requests for the same text share one computation. A failed
/// computation leaves the slot empty so the next caller retries.
#[derive(Default)]
pub struct EmbeddingCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_try_insert<F, Fut, E>(
        &self,
        text: &str,
        compute: F,
    ) -> Result<Arc<Vec<f32>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<f32>, E>>,
    {
        let slot = self.slot(&cache_key(text));
        let vector = slot
            .get_or_try_init(|| async move { compute().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(vector))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.lock();
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn cache_key(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
