use serde::{Deserialize, Serialize};

use boek_draft::BookSummary;

/// Catalog book as the console tables render it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    /// Human identifier, `B` followed by five digits.
    pub code: String,
    pub name: String,
    pub image_url: Option<String>,
    pub publisher: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub cover_price: f64,
    pub released_year: i32,
    pub status: bool,
}

impl Book {
    /// Display row for the picker and the selected-books table.
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            publisher: self.publisher.clone(),
            cover_price: self.cover_price,
            released_year: self.released_year,
        }
    }
}

/// Request model for creating or replacing a book.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub code: String,
    pub name: String,
    pub image_url: Option<String>,
    pub publisher: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub cover_price: f64,
    pub released_year: i32,
    #[serde(default = "BookPayload::default_status")]
    pub status: bool,
}

impl BookPayload {
    fn default_status() -> bool {
        true
    }

    /// Required-field check for the create/update modals; one entry per
    /// violation, shaped like the shared validation envelope.
    pub fn violations(&self) -> Vec<serde_json::Value> {
        let mut details = Vec::new();
        if self.code.trim().is_empty() {
            details.push(serde_json::json!({"field": "code", "error": "required"}));
        }
        if self.name.trim().is_empty() {
            details.push(serde_json::json!({"field": "name", "error": "required"}));
        }
        if self.publisher.trim().is_empty() {
            details.push(serde_json::json!({"field": "publisher", "error": "required"}));
        }
        if self.cover_price < 0.0 {
            details.push(serde_json::json!({"field": "coverPrice", "error": "must be at least 0"}));
        }
        details
    }

    pub fn into_book(self, id: u64) -> Book {
        Book {
            id,
            code: self.code,
            name: self.name,
            image_url: self.image_url,
            publisher: self.publisher,
            isbn10: self.isbn10,
            isbn13: self.isbn13,
            cover_price: self.cover_price,
            released_year: self.released_year,
            status: self.status,
        }
    }
}
