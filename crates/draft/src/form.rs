//! Series form controller: one wizard session's state machine.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::confirm::ConfirmationGate;
use crate::error::DraftError;
use crate::model::{BookSummary, Draft, Genre};
use crate::notice::Notice;
use crate::picker::{filter_by, Picker, PickerListing};
use crate::rules::{self, Field, FieldErrors};
use crate::store::DraftStore;

/// Whether the wizard authors a new series or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

/// Top-level form state.
///
/// `Editing` is the default; `Submitting` is entered only through a fully
/// valid submit; `Succeeded` is terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Editing,
    Submitting,
    Succeeded,
}

/// A single field-level change coming from the form.
#[derive(Debug, Clone)]
pub enum FieldEdit {
    Code(String),
    Name(String),
    Isbn10(String),
    Isbn13(String),
    ReleasedYear(Option<i32>),
    CoverPrice(Option<f64>),
    Genre(u64),
    Description(String),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Code(_) => Field::Code,
            FieldEdit::Name(_) => Field::Name,
            FieldEdit::Isbn10(_) => Field::Isbn10,
            FieldEdit::Isbn13(_) => Field::Isbn13,
            FieldEdit::ReleasedYear(_) => Field::ReleasedYear,
            FieldEdit::CoverPrice(_) => Field::CoverPrice,
            FieldEdit::Genre(_) => Field::GenreId,
            FieldEdit::Description(_) => Field::Description,
        }
    }
}

/// Fully validated series payload handed to the submission collaborator.
/// Field names map 1:1 onto the draft; the wire format beyond that is the
/// collaborator's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub code: String,
    pub name: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub released_year: i32,
    pub cover_price: f64,
    pub genre_id: u64,
    pub description: String,
    pub book_ids: Vec<u64>,
}

/// State machine driving one series-authoring session.
///
/// Owns the draft store for its lifetime: the store fills when the wizard
/// is entered, follows every edit, and empties when the submit resolves
/// successfully.
pub struct SeriesForm {
    mode: FormMode,
    state: FormState,
    store: DraftStore,
    touched: BTreeSet<Field>,
    errors: FieldErrors,
    picker: Picker,
    removal: ConfirmationGate<BookSummary>,
    genres: Vec<Genre>,
    catalog_epoch: u64,
}

impl SeriesForm {
    /// Start a create-mode session with an empty draft.
    pub fn new() -> Self {
        Self::with_store(FormMode::Create, DraftStore::new())
    }

    /// Start an edit-mode session pre-populated with an existing record.
    pub fn edit(existing: Draft) -> Self {
        Self::with_store(FormMode::Edit, DraftStore::seeded(existing))
    }

    fn with_store(mode: FormMode, store: DraftStore) -> Self {
        Self {
            mode,
            state: FormState::Editing,
            store,
            touched: BTreeSet::new(),
            errors: FieldErrors::new(),
            picker: Picker::new(),
            removal: ConfirmationGate::new(),
            genres: Vec::new(),
            catalog_epoch: 0,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        self.store.read()
    }

    /// Errors recorded so far; only touched fields have entries until a
    /// submit attempt touches everything.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    fn guard_editing(&self) -> Result<(), DraftError> {
        match self.state {
            FormState::Submitting => Err(DraftError::SubmitInFlight),
            _ => Ok(()),
        }
    }

    /// Apply a field-level edit: write through to the store, mark the field
    /// touched, and re-validate just that field.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), DraftError> {
        self.guard_editing()?;
        let field = edit.field();

        let mut draft = self.store.read().clone();
        match edit {
            FieldEdit::Code(value) => draft.code = value,
            FieldEdit::Name(value) => draft.name = value,
            FieldEdit::Isbn10(value) => draft.isbn10 = value,
            FieldEdit::Isbn13(value) => draft.isbn13 = value,
            FieldEdit::ReleasedYear(value) => draft.released_year = value,
            FieldEdit::CoverPrice(value) => draft.cover_price = value,
            FieldEdit::Genre(id) => draft.genre_id = Some(id),
            FieldEdit::Description(value) => draft.description = value,
        }

        let message = rules::validate_field(&draft, field, rules::current_year());
        self.store.write(draft);
        self.touched.insert(field);
        self.errors.set(field, message);
        self.state = FormState::Editing;
        Ok(())
    }

    // --- picker -----------------------------------------------------------

    pub fn open_picker(&mut self) {
        self.picker.open();
    }

    pub fn close_picker(&mut self) {
        self.picker.close();
    }

    pub fn set_picker_query(&mut self, query: impl Into<String>) {
        self.picker.set_query(query);
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Filtered candidates for the picker's current query.
    pub fn picker_listing<'a>(&self, catalog: &'a [BookSummary]) -> PickerListing<'a> {
        self.picker.listing(catalog)
    }

    /// Add a catalog book to the selection, rejecting duplicates.
    pub fn add_book(&mut self, book: BookSummary) -> Result<Notice, DraftError> {
        self.guard_editing()?;

        let mut draft = self.store.read().clone();
        let notice = self.picker.select(&mut draft, book)?;

        self.touched.insert(Field::SelectedBooks);
        let message =
            rules::validate_field(&draft, Field::SelectedBooks, rules::current_year());
        self.errors.set(Field::SelectedBooks, message);
        self.store.write(draft);
        Ok(notice)
    }

    // --- removal ----------------------------------------------------------

    /// Ask for confirmation before removing a selected book. Returns the
    /// book awaiting confirmation so the modal can name it.
    pub fn request_removal(&mut self, book_id: u64) -> Option<&BookSummary> {
        let target = self.store.read().book(book_id)?.clone();
        self.removal.open(target);
        self.removal.pending()
    }

    pub fn pending_removal(&self) -> Option<&BookSummary> {
        self.removal.pending()
    }

    pub fn cancel_removal(&mut self) {
        self.removal.cancel();
    }

    /// Apply the confirmed removal. Without a prior [`Self::request_removal`]
    /// there is no pending target and nothing happens; this is the only path
    /// that removes a book from the draft.
    pub fn confirm_removal(&mut self) -> Option<Notice> {
        let target = self.removal.confirm()?;

        let mut draft = self.store.read().clone();
        draft.remove_book(target.id);
        self.touched.insert(Field::SelectedBooks);
        let message =
            rules::validate_field(&draft, Field::SelectedBooks, rules::current_year());
        self.errors.set(Field::SelectedBooks, message);
        self.store.write(draft);

        Some(Notice::success(format!(
            "Removed '{}' from the series",
            target.name
        )))
    }

    // --- genres / catalog -------------------------------------------------

    /// Begin a catalog refresh and return the epoch tagging its response.
    pub fn begin_catalog_refresh(&mut self) -> u64 {
        self.catalog_epoch += 1;
        self.catalog_epoch
    }

    /// Accept a genre listing fetched under `epoch`. Responses from an
    /// earlier epoch arrive after the owning step moved on and are dropped
    /// without touching state.
    pub fn apply_genres(&mut self, epoch: u64, genres: Vec<Genre>) -> bool {
        if epoch != self.catalog_epoch {
            tracing::debug!(
                stale_epoch = epoch,
                current_epoch = self.catalog_epoch,
                "discarding stale genre response"
            );
            return false;
        }
        self.genres = genres;
        true
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn selected_genre(&self) -> Option<&Genre> {
        let id = self.store.read().genre_id?;
        self.genres.iter().find(|genre| genre.id == id)
    }

    /// Genre options matching a combobox query.
    pub fn filter_genres(&self, query: &str) -> Vec<&Genre> {
        filter_by(&self.genres, query, |genre| &genre.name)
    }

    // --- submit -----------------------------------------------------------

    /// Gate the Editing→Submitting transition on a full validation pass.
    ///
    /// On failure every field becomes touched, the errors are recorded for
    /// display, the state stays Editing, and no collaborator call happens.
    /// On success the validated payload is returned and the form waits in
    /// Submitting for [`Self::resolve_submit`].
    pub fn submit(&mut self) -> Result<SeriesPayload, DraftError> {
        self.guard_editing()?;

        let errors = rules::validate(self.store.read(), rules::current_year());
        if !errors.is_empty() {
            self.touched.extend(Field::ALL);
            self.errors = errors.clone();
            self.state = FormState::Editing;
            if let Some((field, message)) = errors.first() {
                tracing::debug!(%field, message, "submit blocked by validation");
            }
            return Err(DraftError::SubmitRejected { errors });
        }

        let draft = self.store.read();
        let (Some(released_year), Some(cover_price), Some(genre_id)) =
            (draft.released_year, draft.cover_price, draft.genre_id)
        else {
            return Err(DraftError::SubmitRejected { errors });
        };

        let payload = SeriesPayload {
            code: draft.code.clone(),
            name: draft.name.clone(),
            isbn10: (!draft.isbn10.is_empty()).then(|| draft.isbn10.clone()),
            isbn13: (!draft.isbn13.is_empty()).then(|| draft.isbn13.clone()),
            released_year,
            cover_price,
            genre_id,
            description: draft.description.clone(),
            book_ids: draft.selected_books.iter().map(|book| book.id).collect(),
        };

        self.errors = FieldErrors::new();
        self.state = FormState::Submitting;
        Ok(payload)
    }

    /// Resolve the in-flight submit. Acceptance ends the session and clears
    /// the draft store; rejection returns the form to Editing with the
    /// draft intact for correction.
    pub fn resolve_submit(&mut self, accepted: bool) {
        if self.state != FormState::Submitting {
            return;
        }
        if accepted {
            self.store.clear();
            self.state = FormState::Succeeded;
        } else {
            self.state = FormState::Editing;
        }
    }
}

impl Default for SeriesForm {
    fn default() -> Self {
        Self::new()
    }
}
