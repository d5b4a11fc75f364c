//! Settings structures for SystemSearch configuration

use crate::apps::DeviceApp;
use crate::bookmarks::Bookmark;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, mirrors settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub ui: UiSettings,
    /// Installed application catalog
    pub apps: Vec<DeviceApp>,
    /// Saved bookmarks offered as suggestions
    pub bookmarks: Vec<Bookmark>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SYSTEMSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SYSTEMSEARCH_AUTOCOMPLETE") {
            self.search.autocomplete = val;
        }
        if let Ok(val) = std::env::var("SYSTEMSEARCH_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("SYSTEMSEARCH_REQUEST_TIMEOUT") {
            if let Ok(secs) = val.parse() {
                self.outgoing.request_timeout = secs;
            }
        }
        if let Ok(val) = std::env::var("SYSTEMSEARCH_PROXY") {
            self.outgoing.proxy = Some(val);
        }
    }
}

/// Autocomplete and merge behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Remote suggestion backend (duckduckgo, google, brave)
    pub autocomplete: String,
    /// Override for the backend endpoint, mostly useful for testing
    pub autocomplete_url: Option<String>,
    /// Quiet period before a query goes to the autocomplete source
    pub debounce_ms: u64,
    /// Cap per group when both suggestions and apps are present
    pub max_results_per_group: usize,
    /// Maximum bookmark suggestions per lookup
    pub bookmark_limit: usize,
    /// How long remote suggestions stay cached (0 disables the cache)
    pub cache_ttl_secs: u64,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            autocomplete: "duckduckgo".to_string(),
            autocomplete_url: None,
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            max_results_per_group: crate::DEFAULT_MAX_RESULTS_PER_GROUP,
            bookmark_limit: 2,
            cache_ttl_secs: 60,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Appended to the generated user agent
    pub useragent_suffix: Option<String>,
    /// Proxy for every outgoing request
    pub proxy: Option<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 3.0,
            useragent_suffix: None,
            proxy: None,
            verify_ssl: true,
        }
    }
}

/// Front end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Show a "no suggestions" row when the list is empty
    pub shows_message_on_no_suggestions: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            shows_message_on_no_suggestions: true,
        }
    }
}
