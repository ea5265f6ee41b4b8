//! Declarative per-field validation for the series draft.
//!
//! Each field is checked independently; the only cross-field rule is the
//! minimum selection size. A field's first violated rule wins, so a
//! nine-character ISBN reports the length message, not the shape message.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::Draft;

/// Earliest accepted release year for a series.
pub const MIN_RELEASED_YEAR: i32 = 2000;

/// Form fields subject to validation, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Code,
    Name,
    Isbn10,
    Isbn13,
    ReleasedYear,
    CoverPrice,
    GenreId,
    Description,
    SelectedBooks,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Code,
        Field::Name,
        Field::Isbn10,
        Field::Isbn13,
        Field::ReleasedYear,
        Field::CoverPrice,
        Field::GenreId,
        Field::Description,
        Field::SelectedBooks,
    ];

    /// Wire name of the field, matching the draft payload keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Name => "name",
            Field::Isbn10 => "isbn10",
            Field::Isbn13 => "isbn13",
            Field::ReleasedYear => "releasedYear",
            Field::CoverPrice => "coverPrice",
            Field::GenreId => "genreId",
            Field::Description => "description",
            Field::SelectedBooks => "selectedBooks",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from field to the message of its first violated rule.
/// A field with no entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, message: Option<String>) {
        match message {
            Some(message) => {
                self.0.insert(field, message);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// First invalid field in display order, for focusing the form.
    pub fn first(&self) -> Option<(Field, &str)> {
        Field::ALL
            .iter()
            .find_map(|field| self.get(*field).map(|message| (*field, message)))
    }
}

/// Calendar year used for the release-year upper bound, read at
/// validation time rather than fixed at startup.
pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}

/// Validate a single field of the draft.
pub fn validate_field(draft: &Draft, field: Field, current_year: i32) -> Option<String> {
    match field {
        Field::Code => required_text(&draft.code, "Series code must not be empty"),
        Field::Name => required_text(&draft.name, "Series name must not be empty"),
        Field::Isbn10 => optional_isbn(&draft.isbn10, 10, "ISBN10"),
        Field::Isbn13 => optional_isbn(&draft.isbn13, 13, "ISBN13"),
        Field::ReleasedYear => match draft.released_year {
            None => Some("Released year must not be empty".to_string()),
            Some(year) if year < MIN_RELEASED_YEAR => Some(format!(
                "Released year must be at least {MIN_RELEASED_YEAR}"
            )),
            Some(year) if year > current_year => Some(format!(
                "Released year must not be later than {current_year}"
            )),
            Some(_) => None,
        },
        Field::CoverPrice => match draft.cover_price {
            None => Some("Cover price must not be empty".to_string()),
            Some(price) if price < 0.0 => Some("Cover price must be at least 0".to_string()),
            Some(_) => None,
        },
        Field::GenreId => draft
            .genre_id
            .is_none()
            .then(|| "A genre must be selected".to_string()),
        Field::Description => required_text(&draft.description, "Description must not be empty"),
        Field::SelectedBooks => draft
            .selected_books
            .is_empty()
            .then(|| "A series must contain at least 1 book".to_string()),
    }
}

/// Validate every field; the returned map has an entry per invalid field.
pub fn validate(draft: &Draft, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        errors.set(field, validate_field(draft, field, current_year));
    }
    errors
}

fn required_text(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

/// ISBNs are optional; when present they must have the exact length and the
/// catalog's shape: an optional 978/979 prefix, nine digits, and a final
/// digit or `X`.
fn optional_isbn(value: &str, length: usize, label: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if value.chars().count() != length {
        return Some(format!("{label} must be {length} characters"));
    }
    if !isbn_shape_ok(value) {
        return Some(format!("{label} is not valid"));
    }
    None
}

fn isbn_shape_ok(value: &str) -> bool {
    fn tail_ok(rest: &str) -> bool {
        let bytes = rest.as_bytes();
        bytes.len() == 10
            && bytes[..9].iter().all(u8::is_ascii_digit)
            && (bytes[9].is_ascii_digit() || bytes[9] == b'X')
    }

    tail_ok(value)
        || value.strip_prefix("978").is_some_and(tail_ok)
        || value.strip_prefix("979").is_some_and(tail_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookSummary;

    fn valid_draft() -> Draft {
        Draft {
            code: "S0001".to_string(),
            name: "Dế Mèn phiêu lưu ký".to_string(),
            isbn10: String::new(),
            isbn13: String::new(),
            released_year: Some(2015),
            cover_price: Some(120_000.0),
            genre_id: Some(3),
            description: "Trọn bộ".to_string(),
            selected_books: vec![BookSummary {
                id: 1,
                code: "B00001".to_string(),
                name: "Tập 1".to_string(),
                image_url: None,
                publisher: "Kim Đồng".to_string(),
                cover_price: 45_000.0,
                released_year: 2015,
            }],
        }
    }

    #[test]
    fn a_fully_populated_draft_passes() {
        assert!(validate(&valid_draft(), 2026).is_empty());
    }

    #[test]
    fn required_fields_report_when_blank() {
        let draft = Draft::default();
        let errors = validate(&draft, 2026);
        for field in [
            Field::Code,
            Field::Name,
            Field::ReleasedYear,
            Field::CoverPrice,
            Field::GenreId,
            Field::Description,
            Field::SelectedBooks,
        ] {
            assert!(errors.get(field).is_some(), "expected error for {field}");
        }
        // Optional ISBNs stay silent while empty.
        assert!(errors.get(Field::Isbn10).is_none());
        assert!(errors.get(Field::Isbn13).is_none());
    }

    #[test]
    fn selected_books_rule_tracks_emptiness_exactly() {
        let mut draft = valid_draft();
        assert!(validate(&draft, 2026).get(Field::SelectedBooks).is_none());

        draft.selected_books.clear();
        assert!(validate(&draft, 2026).get(Field::SelectedBooks).is_some());
    }

    #[test]
    fn isbn_length_message_wins_over_shape() {
        let mut draft = valid_draft();
        draft.isbn10 = "123456789".to_string();
        let errors = validate(&draft, 2026);
        assert_eq!(
            errors.get(Field::Isbn10),
            Some("ISBN10 must be 10 characters")
        );

        draft.isbn10 = "1234567890".to_string();
        assert!(validate(&draft, 2026).get(Field::Isbn10).is_none());
    }

    #[test]
    fn isbn_shape_allows_prefix_and_check_character() {
        let mut draft = valid_draft();

        draft.isbn13 = "9781234567890".to_string();
        assert!(validate(&draft, 2026).get(Field::Isbn13).is_none());

        draft.isbn13 = "979123456789X".to_string();
        assert!(validate(&draft, 2026).get(Field::Isbn13).is_none());

        draft.isbn13 = "9771234567890".to_string();
        assert_eq!(validate(&draft, 2026).get(Field::Isbn13), Some("ISBN13 is not valid"));

        draft.isbn10 = "12345678X0".to_string();
        assert_eq!(validate(&draft, 2026).get(Field::Isbn10), Some("ISBN10 is not valid"));
    }

    #[test]
    fn released_year_upper_bound_tracks_the_given_year() {
        let year = current_year();
        let mut draft = valid_draft();

        draft.released_year = Some(year);
        assert!(validate(&draft, year).get(Field::ReleasedYear).is_none());

        draft.released_year = Some(year + 1);
        assert!(validate(&draft, year).get(Field::ReleasedYear).is_some());

        draft.released_year = Some(1999);
        assert_eq!(
            validate(&draft, year).get(Field::ReleasedYear),
            Some("Released year must be at least 2000")
        );
    }

    #[test]
    fn first_follows_display_order() {
        let draft = Draft::default();
        let errors = validate(&draft, 2026);
        let (field, _) = errors.first().unwrap();
        assert_eq!(field, Field::Code);
    }
}
