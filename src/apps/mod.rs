//! Installed application lookup
//!
//! Matches the typed query against the short names of installed apps so they
//! can be offered next to web suggestions.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the platform needs to start an application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaunchIntent {
    pub package_name: String,
    /// Entry activity; the package's default when absent
    pub activity: Option<String>,
}

impl LaunchIntent {
    pub fn for_package(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            activity: None,
        }
    }
}

/// An installed application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AppEntry", into = "AppEntry")]
pub struct DeviceApp {
    pub short_name: String,
    pub package_name: String,
    pub launch_intent: LaunchIntent,
}

impl DeviceApp {
    pub fn new(short_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        let package_name = package_name.into();
        Self {
            short_name: short_name.into(),
            launch_intent: LaunchIntent::for_package(package_name.clone()),
            package_name,
        }
    }
}

/// Catalog entry as written in settings.yml
#[derive(Serialize, Deserialize)]
struct AppEntry {
    short_name: String,
    package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    activity: Option<String>,
}

impl From<AppEntry> for DeviceApp {
    fn from(entry: AppEntry) -> Self {
        Self {
            launch_intent: LaunchIntent {
                package_name: entry.package_name.clone(),
                activity: entry.activity,
            },
            short_name: entry.short_name,
            package_name: entry.package_name,
        }
    }
}

impl From<DeviceApp> for AppEntry {
    fn from(app: DeviceApp) -> Self {
        Self {
            short_name: app.short_name,
            package_name: app.package_name,
            activity: app.launch_intent.activity,
        }
    }
}

/// Synchronous lookup of installed apps matching a query
pub trait DeviceAppsLookup: Send + Sync {
    fn query(&self, query: &str) -> Vec<DeviceApp>;
}

/// Lookup over a fixed catalog of installed apps
pub struct InstalledAppsLookup {
    apps: Vec<DeviceApp>,
}

impl InstalledAppsLookup {
    /// Build from a catalog; apps are kept ordered by name
    pub fn new(mut apps: Vec<DeviceApp>) -> Self {
        apps.sort_by_key(|app| app.short_name.to_lowercase());
        Self { apps }
    }
}

impl DeviceAppsLookup for InstalledAppsLookup {
    fn query(&self, query: &str) -> Vec<DeviceApp> {
        if query.trim().is_empty() {
            return vec![];
        }

        let pattern = format!(r"\b{}", regex::escape(query));
        let word_prefix = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                debug!("Unusable app query {:?}: {}", query, e);
                return vec![];
            }
        };

        let lowered = query.to_lowercase();
        let (mut name_prefix, word_matches): (Vec<_>, Vec<_>) = self
            .apps
            .iter()
            .filter(|app| word_prefix.is_match(&app.short_name))
            .cloned()
            .partition(|app| app.short_name.to_lowercase().starts_with(&lowered));

        name_prefix.extend(word_matches);
        name_prefix
    }
}
