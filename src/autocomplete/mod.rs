//! Autocomplete suggestions for the search field
//!
//! Combines bookmark matches with phrase suggestions from a remote backend.

mod backends;

pub use backends::{get_backend, list_backends, SuggestionBackend};

use crate::bookmarks::BookmarkStore;
use crate::cache::SuggestionCache;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// A phrase as returned by a remote backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSuggestion {
    pub phrase: String,
    /// Backend's own opinion on whether the phrase is a navigation target
    pub is_nav: Option<bool>,
}

impl RemoteSuggestion {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            is_nav: None,
        }
    }
}

/// One entry of the suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AutoCompleteSuggestion {
    /// Plain search phrase; `is_url` phrases navigate instead of searching
    Search { phrase: String, is_url: bool },
    /// Saved bookmark; `phrase` is the bookmark url
    Bookmark {
        phrase: String,
        title: String,
        url: String,
    },
}

impl AutoCompleteSuggestion {
    pub fn search(phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        let is_url = looks_like_url(&phrase);
        Self::Search { phrase, is_url }
    }

    pub fn bookmark(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self::Bookmark {
            phrase: url.clone(),
            title: title.into(),
            url,
        }
    }

    pub fn phrase(&self) -> &str {
        match self {
            Self::Search { phrase, .. } | Self::Bookmark { phrase, .. } => phrase,
        }
    }

    pub fn is_bookmark(&self) -> bool {
        matches!(self, Self::Bookmark { .. })
    }
}

/// One batch of suggestions for a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoCompleteResult {
    pub query: String,
    pub suggestions: Vec<AutoCompleteSuggestion>,
}

impl AutoCompleteResult {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            suggestions: vec![],
        }
    }
}

/// Asynchronous source of autocomplete suggestions
#[async_trait]
pub trait AutoCompleteApi: Send + Sync {
    async fn autocomplete(&self, query: &str) -> Result<AutoCompleteResult>;
}

/// Bookmarks first, then the remote backend's phrases
pub struct BrowserAutoComplete {
    client: HttpClient,
    backend: Box<dyn SuggestionBackend>,
    bookmarks: BookmarkStore,
    bookmark_limit: usize,
    cache: Option<SuggestionCache>,
}

impl BrowserAutoComplete {
    pub fn new(client: HttpClient, backend: Box<dyn SuggestionBackend>, bookmarks: BookmarkStore) -> Self {
        Self {
            client,
            backend,
            bookmarks,
            bookmark_limit: 2,
            cache: None,
        }
    }

    /// Build from settings: backend, bookmarks, limits and cache
    pub fn from_settings(settings: &Settings, client: HttpClient) -> Result<Self> {
        let search = &settings.search;
        let backend = get_backend(&search.autocomplete, search.autocomplete_url.as_deref())
            .ok_or_else(|| Error::UnknownBackend(search.autocomplete.clone()))?;

        let mut api = Self::new(client, backend, BookmarkStore::new(settings.bookmarks.clone()))
            .with_bookmark_limit(search.bookmark_limit);
        if search.cache_ttl_secs > 0 {
            api = api.with_cache(SuggestionCache::new(search.cache_ttl_secs, 1000));
        }
        Ok(api)
    }

    pub fn with_bookmark_limit(mut self, limit: usize) -> Self {
        self.bookmark_limit = limit;
        self
    }

    pub fn with_cache(mut self, cache: SuggestionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn remote_suggestions(&self, query: &str) -> Result<Vec<RemoteSuggestion>> {
        let backend = self.backend.name();
        if let Some(ref cache) = self.cache {
            if let Some(hit) = cache.get(backend, query).await {
                debug!("Suggestion cache hit for {:?} on {}", query, backend);
                return Ok(hit);
            }
        }

        let fetched = self.backend.suggest(&self.client, query).await?;
        if let Some(ref cache) = self.cache {
            cache.set(backend, query, fetched.clone()).await;
        }
        Ok(fetched)
    }
}

#[async_trait]
impl AutoCompleteApi for BrowserAutoComplete {
    async fn autocomplete(&self, query: &str) -> Result<AutoCompleteResult> {
        if query.trim().is_empty() {
            return Ok(AutoCompleteResult::empty(query));
        }

        let bookmarks = self
            .bookmarks
            .search(query, self.bookmark_limit)
            .into_iter()
            .map(|b| AutoCompleteSuggestion::bookmark(b.title, b.url));

        let searches: Vec<_> = self
            .remote_suggestions(query)
            .await?
            .into_iter()
            .map(|s| {
                let is_url = s.is_nav.unwrap_or_else(|| looks_like_url(&s.phrase));
                AutoCompleteSuggestion::Search {
                    phrase: s.phrase,
                    is_url,
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let suggestions = bookmarks
            .chain(searches)
            .filter(|s| seen.insert(s.phrase().to_string()))
            .collect();

        Ok(AutoCompleteResult {
            query: query.to_string(),
            suggestions,
        })
    }
}

/// Whether a phrase reads as a web address rather than search terms
pub fn looks_like_url(phrase: &str) -> bool {
    let phrase = phrase.trim();
    if phrase.is_empty() || phrase.contains(char::is_whitespace) {
        return false;
    }

    if let Ok(url) = Url::parse(phrase) {
        if matches!(url.scheme(), "http" | "https") {
            return url.host_str().is_some();
        }
    }

    match Url::parse(&format!("http://{}", phrase)) {
        Ok(url) => url
            .host_str()
            .and_then(|host| host.rsplit_once('.'))
            .map(|(name, tld)| {
                !name.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
            })
            .unwrap_or(false),
        Err(_) => false,
    }
}
