//! SystemSearch: a single search field for web suggestions and installed apps
//!
//! The [`controller`] owns the merged view state and debounces autocomplete
//! lookups; the [`adapter`] turns the suggestion list into rows for whatever
//! front end is drawing them.

pub mod adapter;
pub mod apps;
pub mod autocomplete;
pub mod bookmarks;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod network;

pub use adapter::{RowType, SuggestionListAdapter};
pub use apps::{DeviceApp, DeviceAppsLookup, InstalledAppsLookup, LaunchIntent};
pub use autocomplete::{AutoCompleteApi, AutoCompleteResult, AutoCompleteSuggestion};
pub use config::Settings;
pub use controller::{Command, SearchController, ViewState};
pub use error::{Error, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quiet period before a typed query is sent to the autocomplete source
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Per-group cap applied when both suggestions and apps are present
pub const DEFAULT_MAX_RESULTS_PER_GROUP: usize = 4;
