//! View state, commands and the result merge rule

use crate::apps::{DeviceApp, LaunchIntent};
use crate::autocomplete::AutoCompleteSuggestion;

/// Everything the search surface renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query_text: String,
    pub autocomplete_results: Vec<AutoCompleteSuggestion>,
    pub app_results: Vec<DeviceApp>,
}

/// One-shot navigation request for the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LaunchBrowser { query: String },
    LaunchApplication { intent: LaunchIntent },
}

/// Latest raw batches from both sources, before truncation
#[derive(Debug, Default)]
pub(crate) struct RawResults {
    pub autocomplete: Vec<AutoCompleteSuggestion>,
    pub apps: Vec<DeviceApp>,
}

impl RawResults {
    /// Apply the display rule: with both groups present each is cut to
    /// `cap` items, otherwise the single group is shown whole.
    pub fn merged(&self, cap: usize) -> (Vec<AutoCompleteSuggestion>, Vec<DeviceApp>) {
        let limit = if !self.autocomplete.is_empty() && !self.apps.is_empty() {
            cap
        } else {
            usize::MAX
        };

        (
            self.autocomplete.iter().take(limit).cloned().collect(),
            self.apps.iter().take(limit).cloned().collect(),
        )
    }
}
