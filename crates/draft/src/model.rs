use serde::{Deserialize, Serialize};

/// Catalog book eligible for inclusion in a series.
///
/// Display metadata only; the core never mutates catalog entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub image_url: Option<String>,
    pub publisher: String,
    pub cover_price: f64,
    pub released_year: i32,
}

/// Read-only genre reference fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
    pub display_index: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// The in-progress, not-yet-submitted series record being authored.
///
/// `selected_books` is ordered; insertion order is the display order of the
/// series and each book id appears at most once (enforced at add time).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub code: String,
    pub name: String,
    pub isbn10: String,
    pub isbn13: String,
    pub released_year: Option<i32>,
    pub cover_price: Option<f64>,
    pub genre_id: Option<u64>,
    pub description: String,
    pub selected_books: Vec<BookSummary>,
}

impl Draft {
    pub fn contains_book(&self, id: u64) -> bool {
        self.selected_books.iter().any(|book| book.id == id)
    }

    pub fn book(&self, id: u64) -> Option<&BookSummary> {
        self.selected_books.iter().find(|book| book.id == id)
    }

    /// Drop a book from the selection, preserving the order of the rest.
    /// Returns the removed entry, if it was present.
    pub(crate) fn remove_book(&mut self, id: u64) -> Option<BookSummary> {
        let index = self.selected_books.iter().position(|book| book.id == id)?;
        Some(self.selected_books.remove(index))
    }
}
