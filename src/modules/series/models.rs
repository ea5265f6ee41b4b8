use serde::{Deserialize, Serialize};

use boek_draft::{BookSummary, Draft, SeriesPayload};

/// A published series record, the outcome of a completed wizard run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub released_year: i32,
    pub cover_price: f64,
    pub genre_id: u64,
    pub description: String,
    pub books: Vec<BookSummary>,
}

impl Series {
    /// Build the stored record from a validated submission.
    pub fn from_payload(id: u64, payload: &SeriesPayload, books: Vec<BookSummary>) -> Self {
        Self {
            id,
            code: payload.code.clone(),
            name: payload.name.clone(),
            isbn10: payload.isbn10.clone(),
            isbn13: payload.isbn13.clone(),
            released_year: payload.released_year,
            cover_price: payload.cover_price,
            genre_id: payload.genre_id,
            description: payload.description.clone(),
            books,
        }
    }

    /// Reopen the record as an editable draft (edit-mode wizard entry).
    pub fn to_draft(&self) -> Draft {
        Draft {
            code: self.code.clone(),
            name: self.name.clone(),
            isbn10: self.isbn10.clone().unwrap_or_default(),
            isbn13: self.isbn13.clone().unwrap_or_default(),
            released_year: Some(self.released_year),
            cover_price: Some(self.cover_price),
            genre_id: Some(self.genre_id),
            description: self.description.clone(),
            selected_books: self.books.clone(),
        }
    }
}

/// Body for opening a wizard session; a series id switches to edit mode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginWizard {
    pub series_id: Option<u64>,
}

/// Partial field update coming from the form; absent fields stay as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub released_year: Option<i32>,
    pub cover_price: Option<f64>,
    pub genre_id: Option<u64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerQuery {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub book_id: u64,
}
