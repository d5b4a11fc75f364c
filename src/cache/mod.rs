//! Short-lived cache for remote autocomplete answers
//!
//! Typing back and forth over the same prefix would otherwise hit the
//! backend once per keystroke pause.

use crate::autocomplete::RemoteSuggestion;
use moka::future::Cache;
use std::time::Duration;

/// Remote suggestions keyed by backend and query
#[derive(Clone)]
pub struct SuggestionCache {
    cache: Cache<String, Vec<RemoteSuggestion>>,
}

impl SuggestionCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    pub async fn get(&self, backend: &str, query: &str) -> Option<Vec<RemoteSuggestion>> {
        self.cache.get(&cache_key(backend, query)).await
    }

    pub async fn set(&self, backend: &str, query: &str, suggestions: Vec<RemoteSuggestion>) {
        self.cache.insert(cache_key(backend, query), suggestions).await;
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(60, 1000)
    }
}

/// Query text is used verbatim; case is significant
fn cache_key(backend: &str, query: &str) -> String {
    format!("{}:{}", backend, query)
}
