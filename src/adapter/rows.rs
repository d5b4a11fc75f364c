//! Row models and the per-type factories that fill them

use crate::autocomplete::AutoCompleteSuggestion;
use std::fmt;
use std::sync::Arc;

/// Callback fired with the suggestion a row was bound to
pub type SuggestionListener = Arc<dyn Fn(&AutoCompleteSuggestion) + Send + Sync>;

/// Which kind of row a list position renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowType {
    /// Placeholder shown when there is nothing to suggest
    Empty,
    Suggestion,
    Bookmark,
}

/// Leading icon of a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowIcon {
    #[default]
    None,
    Search,
    Globe,
    Bookmark,
}

/// A rendered row: what to show and what a tap does
#[derive(Clone)]
pub struct SuggestionRow {
    pub row_type: RowType,
    pub icon: RowIcon,
    pub title: String,
    pub subtitle: Option<String>,
    suggestion: Option<AutoCompleteSuggestion>,
    on_tap: Option<SuggestionListener>,
    on_edit: Option<SuggestionListener>,
}

impl SuggestionRow {
    pub fn new(row_type: RowType) -> Self {
        Self {
            row_type,
            icon: RowIcon::None,
            title: String::new(),
            subtitle: None,
            suggestion: None,
            on_tap: None,
            on_edit: None,
        }
    }

    /// Suggestion this row is bound to, if any
    pub fn suggestion(&self) -> Option<&AutoCompleteSuggestion> {
        self.suggestion.as_ref()
    }

    /// Whether the row offers the "edit before searching" affordance
    pub fn is_editable(&self) -> bool {
        self.on_edit.is_some()
    }

    /// Tap on the row body. Returns false for rows with nothing to fire.
    pub fn tap(&self) -> bool {
        Self::fire(&self.on_tap, &self.suggestion)
    }

    /// Tap on the edit affordance, which populates the query field instead
    /// of navigating
    pub fn tap_edit(&self) -> bool {
        Self::fire(&self.on_edit, &self.suggestion)
    }

    fn fire(listener: &Option<SuggestionListener>, suggestion: &Option<AutoCompleteSuggestion>) -> bool {
        match (listener, suggestion) {
            (Some(listener), Some(suggestion)) => {
                listener(suggestion);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for SuggestionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionRow")
            .field("row_type", &self.row_type)
            .field("icon", &self.icon)
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("editable", &self.is_editable())
            .finish()
    }
}

/// Creates and binds rows of one [`RowType`]
pub trait RowFactory: Send + Sync {
    fn create_row(&self) -> SuggestionRow;

    fn bind_row(
        &self,
        row: &mut SuggestionRow,
        suggestion: &AutoCompleteSuggestion,
        immediate: &SuggestionListener,
        editable: &SuggestionListener,
    );
}

/// "No suggestions" placeholder
pub struct EmptyRowFactory;

impl RowFactory for EmptyRowFactory {
    fn create_row(&self) -> SuggestionRow {
        let mut row = SuggestionRow::new(RowType::Empty);
        row.title = "No suggestions".to_string();
        row
    }

    fn bind_row(
        &self,
        _row: &mut SuggestionRow,
        _suggestion: &AutoCompleteSuggestion,
        _immediate: &SuggestionListener,
        _editable: &SuggestionListener,
    ) {
    }
}

pub struct SearchRowFactory;

impl RowFactory for SearchRowFactory {
    fn create_row(&self) -> SuggestionRow {
        SuggestionRow::new(RowType::Suggestion)
    }

    fn bind_row(
        &self,
        row: &mut SuggestionRow,
        suggestion: &AutoCompleteSuggestion,
        immediate: &SuggestionListener,
        editable: &SuggestionListener,
    ) {
        let is_url = matches!(suggestion, AutoCompleteSuggestion::Search { is_url: true, .. });
        row.icon = if is_url { RowIcon::Globe } else { RowIcon::Search };
        row.title = suggestion.phrase().to_string();
        row.subtitle = None;
        row.suggestion = Some(suggestion.clone());
        row.on_tap = Some(immediate.clone());
        row.on_edit = Some(editable.clone());
    }
}

pub struct BookmarkRowFactory;

impl RowFactory for BookmarkRowFactory {
    fn create_row(&self) -> SuggestionRow {
        SuggestionRow::new(RowType::Bookmark)
    }

    fn bind_row(
        &self,
        row: &mut SuggestionRow,
        suggestion: &AutoCompleteSuggestion,
        immediate: &SuggestionListener,
        editable: &SuggestionListener,
    ) {
        row.icon = RowIcon::Bookmark;
        match suggestion {
            AutoCompleteSuggestion::Bookmark { title, url, .. } => {
                row.title = title.clone();
                row.subtitle = Some(url.clone());
            }
            other => {
                row.title = other.phrase().to_string();
                row.subtitle = None;
            }
        }
        row.suggestion = Some(suggestion.clone());
        row.on_tap = Some(immediate.clone());
        row.on_edit = Some(editable.clone());
    }
}
