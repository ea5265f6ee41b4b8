pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tokio::sync::RwLock;

use boek_draft::picker::filter_by;
use boek_http::error::AppError;
use boek_http::pagination::{paginate, PageQuery, Paginated};
use boek_kernel::roles::{RouteAccess, ISSUER_ONLY};
use boek_kernel::{InitCtx, Module};

use models::{Book, BookPayload};

/// Shared handle to the in-memory book table.
pub type BookRepo = Arc<RwLock<Vec<Book>>>;

/// Issuer-facing catalog CRUD: the paginated book table plus the
/// candidate feed the series picker draws from.
pub struct BooksModule {
    repo: BookRepo,
}

impl BooksModule {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(RwLock::new(seed_books())),
        }
    }

    pub fn repo(&self) -> BookRepo {
        self.repo.clone()
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn access(&self) -> RouteAccess {
        ISSUER_ONLY
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let seeded = self.repo.read().await.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            seeded = seeded,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route(
                "/{id}",
                get(get_book).put(update_book).delete(delete_book),
            )
            .with_state(self.repo.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer"}},
                            {"name": "size", "in": "query", "schema": {"type": "integer"}},
                            {"name": "name", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "data": {
                                                    "type": "array",
                                                    "items": {"$ref": "#/components/schemas/Book"}
                                                },
                                                "metadata": {"type": "object"}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "responses": {
                            "201": {"description": "Created"},
                            "422": {
                                "description": "Validation error",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "code": {"type": "string"},
                            "name": {"type": "string"},
                            "imageUrl": {"type": "string", "nullable": true},
                            "publisher": {"type": "string"},
                            "coverPrice": {"type": "number"},
                            "releasedYear": {"type": "integer"},
                            "status": {"type": "boolean"}
                        },
                        "required": ["id", "code", "name", "publisher"]
                    }
                }
            }
        }))
    }
}

async fn list_books(
    State(repo): State<BookRepo>,
    Query(query): Query<PageQuery>,
) -> Json<Paginated<Book>> {
    let books = repo.read().await;
    let matches: Vec<Book> = match &query.name {
        Some(name) => filter_by(&books, name, |book| &book.name)
            .into_iter()
            .cloned()
            .collect(),
        None => books.clone(),
    };
    Json(paginate(&matches, &query))
}

async fn get_book(
    State(repo): State<BookRepo>,
    Path(id): Path<u64>,
) -> Result<Json<Book>, AppError> {
    let books = repo.read().await;
    books
        .iter()
        .find(|book| book.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))
}

async fn create_book(
    State(repo): State<BookRepo>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let violations = payload.violations();
    if !violations.is_empty() {
        return Err(AppError::validation(violations, "book payload is not valid"));
    }

    let mut books = repo.write().await;
    if books.iter().any(|book| book.code == payload.code) {
        return Err(AppError::conflict(
            vec![serde_json::json!({"field": "code", "error": "already in use"})],
            format!("book code '{}' already exists", payload.code),
        ));
    }

    let id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
    let book = payload.into_book(id);
    books.push(book.clone());
    tracing::info!(book = id, code = %book.code, "book created");
    Ok(Json(book))
}

async fn update_book(
    State(repo): State<BookRepo>,
    Path(id): Path<u64>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let violations = payload.violations();
    if !violations.is_empty() {
        return Err(AppError::validation(violations, "book payload is not valid"));
    }

    let mut books = repo.write().await;
    let slot = books
        .iter_mut()
        .find(|book| book.id == id)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))?;
    *slot = payload.into_book(id);
    Ok(Json(slot.clone()))
}

async fn delete_book(
    State(repo): State<BookRepo>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut books = repo.write().await;
    let index = books
        .iter()
        .position(|book| book.id == id)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))?;
    books.remove(index);
    Ok(Json(serde_json::json!({"deleted": id})))
}

fn seed_books() -> Vec<Book> {
    let rows: [(&str, &str, f64, i32); 6] = [
        ("Dế Mèn phiêu lưu ký", "NXB Kim Đồng", 45_000.0, 2015),
        ("Kính Vạn Hoa - Tập 1", "NXB Trẻ", 60_000.0, 2018),
        ("Kính Vạn Hoa - Tập 2", "NXB Trẻ", 60_000.0, 2018),
        ("Số đỏ", "NXB Văn học", 72_000.0, 2016),
        ("Tuổi thơ dữ dội", "NXB Kim Đồng", 98_000.0, 2019),
        ("Đất rừng phương Nam", "NXB Kim Đồng", 85_000.0, 2017),
    ];

    rows.iter()
        .enumerate()
        .map(|(index, (name, publisher, price, year))| {
            let id = index as u64 + 1;
            Book {
                id,
                code: format!("B{id:05}"),
                name: name.to_string(),
                image_url: Some(format!("https://cdn.boek.live/covers/{id}.jpg")),
                publisher: publisher.to_string(),
                isbn10: None,
                isbn13: None,
                cover_price: *price,
                released_year: *year,
                status: true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_filters_by_name_before_paging() {
        let repo: BookRepo = Arc::new(RwLock::new(seed_books()));
        let query = PageQuery {
            page: 1,
            size: 10,
            name: Some("kính vạn".to_string()),
        };

        let Json(page) = list_books(State(repo), Query(query)).await;
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.metadata.total_count, 2);
        assert!(page.data.iter().all(|book| book.name.contains("Kính")));
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let repo: BookRepo = Arc::new(RwLock::new(seed_books()));
        let payload = BookPayload {
            code: "B00001".to_string(),
            name: "Another".to_string(),
            image_url: None,
            publisher: "NXB Trẻ".to_string(),
            isbn10: None,
            isbn13: None,
            cover_price: 10_000.0,
            released_year: 2020,
            status: true,
        };

        let err = create_book(State(repo), Json(payload)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn blank_required_fields_are_rejected() {
        let repo: BookRepo = Arc::new(RwLock::new(Vec::new()));
        let payload = BookPayload {
            code: "  ".to_string(),
            name: String::new(),
            image_url: None,
            publisher: "NXB Trẻ".to_string(),
            isbn10: None,
            isbn13: None,
            cover_price: -5.0,
            released_year: 2020,
            status: true,
        };

        let err = create_book(State(repo.clone()), Json(payload))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(repo.read().await.is_empty());
    }
}
