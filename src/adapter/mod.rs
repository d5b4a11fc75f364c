//! Suggestion list adapter
//!
//! Maps the current suggestion list onto rows. Each [`RowType`] has its own
//! [`RowFactory`]; every data change is announced as one full refresh.

mod rows;

pub use rows::{
    BookmarkRowFactory, EmptyRowFactory, RowFactory, RowIcon, RowType, SearchRowFactory,
    SuggestionListener, SuggestionRow,
};

use crate::autocomplete::AutoCompleteSuggestion;
use std::sync::Arc;
use tracing::debug;

/// Receives the full-refresh signal after the list changes
pub type DataSetObserver = Box<dyn Fn() + Send + Sync>;

/// Binds a list of suggestions to rows
pub struct SuggestionListAdapter {
    immediate_listener: SuggestionListener,
    editable_listener: SuggestionListener,
    shows_message_on_no_suggestions: bool,
    empty_factory: Box<dyn RowFactory>,
    suggestion_factory: Box<dyn RowFactory>,
    bookmark_factory: Box<dyn RowFactory>,
    observer: Option<DataSetObserver>,
    suggestions: Vec<AutoCompleteSuggestion>,
}

impl SuggestionListAdapter {
    /// `immediate` fires on a plain tap; `editable` fires when the user wants
    /// the suggestion copied into the query field instead of navigating
    pub fn new<I, E>(immediate: I, editable: E) -> Self
    where
        I: Fn(&AutoCompleteSuggestion) + Send + Sync + 'static,
        E: Fn(&AutoCompleteSuggestion) + Send + Sync + 'static,
    {
        Self {
            immediate_listener: Arc::new(immediate),
            editable_listener: Arc::new(editable),
            shows_message_on_no_suggestions: true,
            empty_factory: Box::new(EmptyRowFactory),
            suggestion_factory: Box::new(SearchRowFactory),
            bookmark_factory: Box::new(BookmarkRowFactory),
            observer: None,
            suggestions: Vec::new(),
        }
    }

    /// Whether an empty list renders a placeholder row
    pub fn shows_message_on_no_suggestions(mut self, show: bool) -> Self {
        self.shows_message_on_no_suggestions = show;
        self
    }

    /// Replace the factory used for one row type
    pub fn with_factory(mut self, row_type: RowType, factory: Box<dyn RowFactory>) -> Self {
        match row_type {
            RowType::Empty => self.empty_factory = factory,
            RowType::Suggestion => self.suggestion_factory = factory,
            RowType::Bookmark => self.bookmark_factory = factory,
        }
        self
    }

    pub fn set_observer(&mut self, observer: DataSetObserver) {
        self.observer = Some(observer);
    }

    fn factory(&self, row_type: RowType) -> &dyn RowFactory {
        match row_type {
            RowType::Empty => self.empty_factory.as_ref(),
            RowType::Suggestion => self.suggestion_factory.as_ref(),
            RowType::Bookmark => self.bookmark_factory.as_ref(),
        }
    }

    pub fn suggestions(&self) -> &[AutoCompleteSuggestion] {
        &self.suggestions
    }

    pub fn item_count(&self) -> usize {
        if !self.suggestions.is_empty() {
            return self.suggestions.len();
        }
        usize::from(self.shows_message_on_no_suggestions)
    }

    pub fn item_view_type(&self, position: usize) -> RowType {
        if self.suggestions.is_empty() {
            return RowType::Empty;
        }
        match self.suggestions.get(position) {
            Some(suggestion) if suggestion.is_bookmark() => RowType::Bookmark,
            _ => RowType::Suggestion,
        }
    }

    pub fn create_row(&self, row_type: RowType) -> SuggestionRow {
        self.factory(row_type).create_row()
    }

    pub fn bind_row(&self, row: &mut SuggestionRow, position: usize) {
        if row.row_type == RowType::Empty {
            return;
        }
        if let Some(suggestion) = self.suggestions.get(position) {
            self.factory(self.item_view_type(position)).bind_row(
                row,
                suggestion,
                &self.immediate_listener,
                &self.editable_listener,
            );
        }
    }

    /// Create and bind every visible row
    pub fn rows(&self) -> Vec<SuggestionRow> {
        (0..self.item_count())
            .map(|position| {
                let mut row = self.create_row(self.item_view_type(position));
                self.bind_row(&mut row, position);
                row
            })
            .collect()
    }

    /// Replace the list. Returns false, without signalling, when the new list
    /// equals the current one.
    pub fn update_data(&mut self, new_suggestions: &[AutoCompleteSuggestion]) -> bool {
        if self.suggestions.as_slice() == new_suggestions {
            return false;
        }

        self.suggestions.clear();
        self.suggestions.extend_from_slice(new_suggestions);
        debug!("Suggestion list replaced with {} items", self.suggestions.len());

        if let Some(ref observer) = self.observer {
            observer();
        }
        true
    }
}
