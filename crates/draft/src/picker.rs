//! Searchable picker overlay for adding catalog books to the draft.

use crate::error::DraftError;
use crate::model::{BookSummary, Draft};
use crate::notice::Notice;

/// Case-insensitive substring filter over any labelled item list.
///
/// The projection is an explicit function rather than a string-keyed field
/// lookup, so the same filter serves books in the picker and genres in the
/// combobox.
pub fn filter_by<'a, T>(
    items: &'a [T],
    query: &str,
    label: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|&item| label(item).to_lowercase().contains(&needle))
        .collect()
}

/// What the picker shows for the current query.
#[derive(Debug, PartialEq)]
pub enum PickerListing<'a> {
    Books(Vec<&'a BookSummary>),
    /// The catalog itself has nothing to offer.
    EmptyCatalog,
    /// The catalog has books, but none match the query.
    NoMatches,
}

/// Modal state for the book picker: visibility plus the search query.
///
/// Filtering is synchronous and recomputed from the full candidate list on
/// every query change, never incrementally narrowed.
#[derive(Debug, Default)]
pub struct Picker {
    open: bool,
    query: String,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Show the modal with a fresh, empty search box.
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
    }

    /// Hide the modal and discard the query.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Candidates for the current query, with the empty states kept apart
    /// so the client can tell "nothing in the catalog" from "no hits".
    pub fn listing<'a>(&self, catalog: &'a [BookSummary]) -> PickerListing<'a> {
        if catalog.is_empty() {
            return PickerListing::EmptyCatalog;
        }
        let matches = filter_by(catalog, &self.query, |book| &book.name);
        if matches.is_empty() {
            PickerListing::NoMatches
        } else {
            PickerListing::Books(matches)
        }
    }

    /// Add a book to the draft's selection.
    ///
    /// A book already in the selection is rejected without touching the
    /// draft; otherwise the book is appended after the existing entries and
    /// the modal closes.
    pub fn select(
        &mut self,
        draft: &mut Draft,
        book: BookSummary,
    ) -> Result<Notice, DraftError> {
        if draft.contains_book(book.id) {
            return Err(DraftError::DuplicateSelection { name: book.name });
        }
        let name = book.name.clone();
        draft.selected_books.push(book);
        self.close();
        Ok(Notice::success(format!("Added '{name}' to the series")))
    }
}
