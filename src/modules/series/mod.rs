pub mod models;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use boek_catalog::{CatalogSource, Listing, ListingQuery, NamedRef, StaticCatalog};
use boek_draft::form::{FieldEdit, SeriesForm};
use boek_draft::{BookSummary, DraftError, FieldErrors, Genre, PickerListing};
use boek_http::error::AppError;
use boek_http::pagination::{paginate, PageQuery, Paginated};
use boek_kernel::roles::{RouteAccess, ISSUER_ONLY};
use boek_kernel::{InitCtx, Module};

use crate::modules::books::BookRepo;
use crate::utils::format_price;

use models::{BeginWizard, BookRef, DraftPatch, PickerQuery, Series};

/// Candidate feed backed by the console's own repositories, used in the
/// local environment instead of the shared catalog API.
pub struct ConsoleCatalog {
    books: BookRepo,
    genres: Vec<Genre>,
}

impl ConsoleCatalog {
    pub fn new(books: BookRepo, genres: Vec<Genre>) -> Self {
        Self { books, genres }
    }

    async fn snapshot(&self) -> StaticCatalog {
        let books = self.books.read().await;
        StaticCatalog {
            genres: self.genres.clone(),
            books: books
                .iter()
                .filter(|book| book.status)
                .map(|book| book.summary())
                .collect(),
            ..StaticCatalog::default()
        }
    }
}

#[async_trait]
impl CatalogSource for ConsoleCatalog {
    async fn child_genres(&self) -> boek_catalog::Result<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    async fn books(&self, query: &ListingQuery) -> boek_catalog::Result<Listing<BookSummary>> {
        self.snapshot().await.books(query).await
    }

    async fn publishers(&self, query: &ListingQuery) -> boek_catalog::Result<Listing<NamedRef>> {
        self.snapshot().await.publishers(query).await
    }

    async fn authors(&self, query: &ListingQuery) -> boek_catalog::Result<Listing<NamedRef>> {
        self.snapshot().await.authors(query).await
    }

    async fn categories(&self, query: &ListingQuery) -> boek_catalog::Result<Listing<NamedRef>> {
        self.snapshot().await.categories(query).await
    }
}

/// One server-held wizard run: the form state machine plus the series it
/// edits, when opened in edit mode.
struct WizardSession {
    form: SeriesForm,
    target: Option<u64>,
}

struct SeriesState {
    wizards: RwLock<HashMap<Uuid, WizardSession>>,
    series: RwLock<Vec<Series>>,
    catalog: Arc<dyn CatalogSource>,
    listing_size: u32,
}

/// Issuer-facing series CRUD plus the multi-step creation wizard.
pub struct SeriesModule {
    state: Arc<SeriesState>,
}

impl SeriesModule {
    pub fn new(catalog: Arc<dyn CatalogSource>, listing_size: u32) -> Self {
        Self {
            state: Arc::new(SeriesState {
                wizards: RwLock::new(HashMap::new()),
                series: RwLock::new(Vec::new()),
                catalog,
                listing_size,
            }),
        }
    }
}

#[async_trait]
impl Module for SeriesModule {
    fn name(&self) -> &'static str {
        "series"
    }

    fn access(&self) -> RouteAccess {
        ISSUER_ONLY
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "series module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_series))
            .route("/{id}", get(get_series))
            .route("/wizard", post(begin_wizard))
            .route("/wizard/{id}", get(snapshot).delete(abandon_wizard))
            .route("/wizard/{id}/draft", axum::routing::patch(patch_draft))
            .route("/wizard/{id}/genres", get(wizard_genres))
            .route("/wizard/{id}/picker/open", post(open_picker))
            .route("/wizard/{id}/picker/query", put(set_picker_query))
            .route("/wizard/{id}/picker/select", post(select_book))
            .route("/wizard/{id}/picker/close", post(close_picker))
            .route("/wizard/{id}/removal", post(request_removal))
            .route("/wizard/{id}/removal/confirm", post(confirm_removal))
            .route("/wizard/{id}/removal/cancel", post(cancel_removal))
            .route("/wizard/{id}/submit", post(submit_wizard))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List series",
                        "tags": ["Series"],
                        "responses": {
                            "200": {"description": "One page of series"}
                        }
                    }
                },
                "/wizard": {
                    "post": {
                        "summary": "Open a series wizard session",
                        "tags": ["Series"],
                        "responses": {
                            "200": {"description": "Wizard snapshot with session id"}
                        }
                    }
                },
                "/wizard/{id}/submit": {
                    "post": {
                        "summary": "Validate and submit the draft",
                        "tags": ["Series"],
                        "responses": {
                            "200": {"description": "Series persisted"},
                            "422": {
                                "description": "Draft failed validation",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

type AppState = Arc<SeriesState>;

fn field_error_details(errors: &FieldErrors) -> Vec<serde_json::Value> {
    errors
        .iter()
        .map(|(field, message)| json!({"field": field.as_str(), "error": message}))
        .collect()
}

fn draft_error(err: DraftError) -> AppError {
    match err {
        DraftError::DuplicateSelection { .. } => AppError::conflict(
            vec![json!({"field": "selectedBooks", "error": err.to_string()})],
            err.to_string(),
        ),
        DraftError::SubmitRejected { ref errors } => {
            AppError::validation(field_error_details(errors), err.to_string())
        }
        DraftError::SubmitInFlight => AppError::conflict(vec![], err.to_string()),
    }
}

fn session_snapshot(id: Uuid, session: &WizardSession) -> serde_json::Value {
    let form = &session.form;
    let selected_rows: Vec<serde_json::Value> = form
        .draft()
        .selected_books
        .iter()
        .map(|book| {
            json!({
                "book": book,
                "priceLabel": format_price(book.cover_price),
            })
        })
        .collect();

    json!({
        "sessionId": id,
        "mode": form.mode(),
        "state": form.state(),
        "draft": form.draft(),
        "errors": form.errors(),
        "picker": {
            "open": form.picker().is_open(),
            "query": form.picker().query(),
        },
        "pendingRemoval": form.pending_removal(),
        "selectedRows": selected_rows,
    })
}

fn listing_body(listing: PickerListing<'_>) -> serde_json::Value {
    match listing {
        PickerListing::Books(matches) => json!({"books": matches, "emptyState": null}),
        PickerListing::EmptyCatalog => json!({"books": [], "emptyState": "emptyCatalog"}),
        PickerListing::NoMatches => json!({"books": [], "emptyState": "noMatches"}),
    }
}

fn unknown_session(id: Uuid) -> AppError {
    AppError::not_found(format!("wizard session {id} not found"))
}

async fn candidates(state: &SeriesState) -> Result<Vec<BookSummary>, AppError> {
    let listing = state
        .catalog
        .books(&ListingQuery::all(state.listing_size))
        .await
        .map_err(|err| AppError::Internal(err.into()))?;
    Ok(listing.data)
}

// --- series table -----------------------------------------------------------

async fn list_series(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<Paginated<Series>> {
    let series = state.series.read().await;
    let matches: Vec<Series> = match &query.name {
        Some(name) => boek_draft::picker::filter_by(&series, name, |s| &s.name)
            .into_iter()
            .cloned()
            .collect(),
        None => series.clone(),
    };
    Json(paginate(&matches, &query))
}

async fn get_series(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Series>, AppError> {
    let series = state.series.read().await;
    series
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("series {id} not found")))
}

// --- wizard lifecycle -------------------------------------------------------

async fn begin_wizard(
    State(state): State<AppState>,
    Json(body): Json<BeginWizard>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = match body.series_id {
        Some(series_id) => {
            let series = state.series.read().await;
            let existing = series
                .iter()
                .find(|s| s.id == series_id)
                .ok_or_else(|| AppError::not_found(format!("series {series_id} not found")))?;
            WizardSession {
                form: SeriesForm::edit(existing.to_draft()),
                target: Some(series_id),
            }
        }
        None => WizardSession {
            form: SeriesForm::new(),
            target: None,
        },
    };

    let id = Uuid::new_v4();
    let snapshot = session_snapshot(id, &session);
    state.wizards.write().await.insert(id, session);
    tracing::info!(session = %id, "wizard session opened");
    Ok(Json(snapshot))
}

async fn snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let wizards = state.wizards.read().await;
    let session = wizards.get(&id).ok_or_else(|| unknown_session(id))?;
    Ok(Json(session_snapshot(id, session)))
}

/// Explicit navigation away discards the in-progress draft.
async fn abandon_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = state.wizards.write().await.remove(&id).is_some();
    if !removed {
        return Err(unknown_session(id));
    }
    tracing::info!(session = %id, "wizard session abandoned");
    Ok(Json(json!({"discarded": true})))
}

async fn patch_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut edits: Vec<FieldEdit> = Vec::new();
    if let Some(value) = patch.code {
        edits.push(FieldEdit::Code(value));
    }
    if let Some(value) = patch.name {
        edits.push(FieldEdit::Name(value));
    }
    if let Some(value) = patch.isbn10 {
        edits.push(FieldEdit::Isbn10(value));
    }
    if let Some(value) = patch.isbn13 {
        edits.push(FieldEdit::Isbn13(value));
    }
    if let Some(value) = patch.released_year {
        edits.push(FieldEdit::ReleasedYear(Some(value)));
    }
    if let Some(value) = patch.cover_price {
        edits.push(FieldEdit::CoverPrice(Some(value)));
    }
    if let Some(value) = patch.genre_id {
        edits.push(FieldEdit::Genre(value));
    }
    if let Some(value) = patch.description {
        edits.push(FieldEdit::Description(value));
    }

    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    for edit in edits {
        session.form.apply(edit).map_err(draft_error)?;
    }
    Ok(Json(session_snapshot(id, session)))
}

/// Genre feed for the wizard's combobox, guarded against stale responses:
/// the refresh is tagged with an epoch and a response from a superseded
/// refresh is dropped instead of overwriting newer state.
async fn wizard_genres(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let epoch = {
        let mut wizards = state.wizards.write().await;
        let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
        session.form.begin_catalog_refresh()
    };

    let genres = state
        .catalog
        .child_genres()
        .await
        .map_err(|err| AppError::Internal(err.into()))?;

    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    session.form.apply_genres(epoch, genres);
    Ok(Json(json!({
        "genres": session.form.genres(),
        "selectedGenre": session.form.selected_genre(),
    })))
}

// --- picker -----------------------------------------------------------------

async fn open_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let books = candidates(&state).await?;
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    session.form.open_picker();
    Ok(Json(listing_body(session.form.picker_listing(&books))))
}

async fn set_picker_query(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PickerQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let books = candidates(&state).await?;
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    session.form.set_picker_query(body.query);
    Ok(Json(listing_body(session.form.picker_listing(&books))))
}

async fn select_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BookRef>,
) -> Result<Json<serde_json::Value>, AppError> {
    let books = candidates(&state).await?;
    let book = books
        .into_iter()
        .find(|book| book.id == body.book_id)
        .ok_or_else(|| AppError::not_found(format!("book {} not found", body.book_id)))?;

    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    let notice = session.form.add_book(book).map_err(draft_error)?;
    Ok(Json(json!({
        "notice": notice,
        "snapshot": session_snapshot(id, session),
    })))
}

async fn close_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    session.form.close_picker();
    Ok(Json(session_snapshot(id, session)))
}

// --- removal ----------------------------------------------------------------

async fn request_removal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BookRef>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    let pending = session.form.request_removal(body.book_id).ok_or_else(|| {
        AppError::not_found(format!("book {} is not in the series draft", body.book_id))
    })?;
    let pending = pending.clone();
    Ok(Json(json!({"pendingRemoval": pending})))
}

async fn confirm_removal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    let notice = session
        .form
        .confirm_removal()
        .ok_or_else(|| AppError::bad_request("no removal awaiting confirmation"))?;
    Ok(Json(json!({
        "notice": notice,
        "snapshot": session_snapshot(id, session),
    })))
}

async fn cancel_removal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;
    session.form.cancel_removal();
    Ok(Json(session_snapshot(id, session)))
}

// --- submit -----------------------------------------------------------------

async fn submit_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut wizards = state.wizards.write().await;
    let session = wizards.get_mut(&id).ok_or_else(|| unknown_session(id))?;

    let payload = session.form.submit().map_err(draft_error)?;
    let books = session.form.draft().selected_books.clone();

    let mut series = state.series.write().await;
    let series_id = match session.target {
        Some(series_id) => {
            let Some(slot) = series.iter_mut().find(|s| s.id == series_id) else {
                // The record was deleted out from under the wizard; send
                // the form back to Editing instead of wedging it mid-submit.
                drop(series);
                session.form.resolve_submit(false);
                return Err(AppError::not_found(format!("series {series_id} not found")));
            };
            *slot = Series::from_payload(series_id, &payload, books);
            series_id
        }
        None => {
            let series_id = series.iter().map(|s| s.id).max().unwrap_or(0) + 1;
            series.push(Series::from_payload(series_id, &payload, books));
            series_id
        }
    };
    drop(series);

    // The repository accepted the record; the session is finished and the
    // draft slot empties rather than lingering for the next wizard run.
    session.form.resolve_submit(true);
    wizards.remove(&id);
    tracing::info!(session = %id, series = series_id, "series submitted");

    Ok(Json(json!({
        "notice": boek_draft::Notice::success("Series saved"),
        "seriesId": series_id,
        "payload": payload,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{books::BooksModule, genres};

    fn test_state() -> AppState {
        let books = BooksModule::new();
        let catalog = Arc::new(ConsoleCatalog::new(books.repo(), genres::seed()));
        Arc::new(SeriesState {
            wizards: RwLock::new(HashMap::new()),
            series: RwLock::new(Vec::new()),
            catalog,
            listing_size: 1000,
        })
    }

    async fn open_session(state: &AppState) -> Uuid {
        let Json(body) = begin_wizard(State(state.clone()), Json(BeginWizard::default()))
            .await
            .unwrap();
        body["sessionId"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn duplicate_picker_selection_is_a_conflict() {
        let state = test_state();
        let id = open_session(&state).await;

        select_book(State(state.clone()), Path(id), Json(BookRef { book_id: 1 }))
            .await
            .unwrap();
        let err = select_book(State(state.clone()), Path(id), Json(BookRef { book_id: 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let wizards = state.wizards.read().await;
        let session = wizards.get(&id).unwrap();
        assert_eq!(session.form.draft().selected_books.len(), 1);
    }

    #[tokio::test]
    async fn submit_rejects_an_empty_draft_with_field_details() {
        let state = test_state();
        let id = open_session(&state).await;

        let err = submit_wizard(State(state.clone()), Path(id))
            .await
            .unwrap_err();
        match err {
            AppError::Validation { details, .. } => {
                assert!(details
                    .iter()
                    .any(|detail| detail["field"] == "selectedBooks"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        // A rejected submit leaves the session alive for correction.
        assert!(state.wizards.read().await.contains_key(&id));
    }

    #[tokio::test]
    async fn full_wizard_run_persists_the_series_and_ends_the_session() {
        let state = test_state();
        let id = open_session(&state).await;

        patch_draft(
            State(state.clone()),
            Path(id),
            Json(DraftPatch {
                code: Some("S0001".to_string()),
                name: Some("Kính Vạn Hoa".to_string()),
                released_year: Some(2018),
                cover_price: Some(120_000.0),
                genre_id: Some(1),
                description: Some("Trọn bộ".to_string()),
                ..DraftPatch::default()
            }),
        )
        .await
        .unwrap();

        select_book(State(state.clone()), Path(id), Json(BookRef { book_id: 2 }))
            .await
            .unwrap();
        select_book(State(state.clone()), Path(id), Json(BookRef { book_id: 3 }))
            .await
            .unwrap();

        // Removal only applies after an explicit confirmation.
        request_removal(State(state.clone()), Path(id), Json(BookRef { book_id: 3 }))
            .await
            .unwrap();
        cancel_removal(State(state.clone()), Path(id)).await.unwrap();
        request_removal(State(state.clone()), Path(id), Json(BookRef { book_id: 3 }))
            .await
            .unwrap();
        confirm_removal(State(state.clone()), Path(id)).await.unwrap();

        let Json(result) = submit_wizard(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(result["seriesId"], 1);

        assert!(state.wizards.read().await.is_empty());
        let series = state.series.read().await;
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].code, "S0001");
        let ids: Vec<u64> = series[0].books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn picker_reports_no_matches_distinctly() {
        let state = test_state();
        let id = open_session(&state).await;

        open_picker(State(state.clone()), Path(id)).await.unwrap();
        let Json(body) = set_picker_query(
            State(state.clone()),
            Path(id),
            Json(PickerQuery {
                query: "không tồn tại".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(body["emptyState"], "noMatches");
        assert!(body["books"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn editing_an_existing_series_reopens_its_draft() {
        let state = test_state();

        // Author one series first.
        let id = open_session(&state).await;
        patch_draft(
            State(state.clone()),
            Path(id),
            Json(DraftPatch {
                code: Some("S0002".to_string()),
                name: Some("Tuyển tập".to_string()),
                released_year: Some(2019),
                cover_price: Some(90_000.0),
                genre_id: Some(2),
                description: Some("Một bộ".to_string()),
                ..DraftPatch::default()
            }),
        )
        .await
        .unwrap();
        select_book(State(state.clone()), Path(id), Json(BookRef { book_id: 1 }))
            .await
            .unwrap();
        submit_wizard(State(state.clone()), Path(id)).await.unwrap();

        let Json(body) = begin_wizard(
            State(state.clone()),
            Json(BeginWizard { series_id: Some(1) }),
        )
        .await
        .unwrap();
        assert_eq!(body["mode"], "edit");
        assert_eq!(body["draft"]["code"], "S0002");
        assert_eq!(body["draft"]["selectedBooks"].as_array().unwrap().len(), 1);
    }
}
