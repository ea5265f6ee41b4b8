//! Admin-facing category management: the paginated category table and the
//! modal create/update flows.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use boek_draft::picker::filter_by;
use boek_http::error::AppError;
use boek_http::pagination::{paginate, PageQuery, Paginated};
use boek_kernel::roles::{RouteAccess, SYSTEM_ONLY};
use boek_kernel::{InitCtx, Module};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreRef {
    pub id: u64,
    pub name: String,
}

/// Book category with its discount level and member genres.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    /// Discount percentage applied to books of this category.
    pub percentages: u32,
    pub genres: Vec<GenreRef>,
    pub status: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub percentages: u32,
    #[serde(default = "CategoryPayload::default_status")]
    pub status: bool,
}

impl CategoryPayload {
    fn default_status() -> bool {
        true
    }
}

type Repo = Arc<RwLock<Vec<Category>>>;

pub struct CategoriesModule {
    repo: Repo,
}

impl CategoriesModule {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(RwLock::new(seed_categories())),
        }
    }
}

impl Default for CategoriesModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn access(&self) -> RouteAccess {
        SYSTEM_ONLY
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "categories module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_categories).post(create_category))
            .route("/{id}", get(get_category).put(update_category))
            .with_state(self.repo.clone())
    }
}

async fn list_categories(
    State(repo): State<Repo>,
    Query(query): Query<PageQuery>,
) -> Json<Paginated<Category>> {
    let categories = repo.read().await;
    let matches: Vec<Category> = match &query.name {
        Some(name) => filter_by(&categories, name, |category| &category.name)
            .into_iter()
            .cloned()
            .collect(),
        None => categories.clone(),
    };
    Json(paginate(&matches, &query))
}

async fn get_category(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
) -> Result<Json<Category>, AppError> {
    let categories = repo.read().await;
    categories
        .iter()
        .find(|category| category.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("category {id} not found")))
}

async fn create_category(
    State(repo): State<Repo>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation(
            vec![serde_json::json!({"field": "name", "error": "required"})],
            "category name must not be empty",
        ));
    }

    let mut categories = repo.write().await;
    let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let category = Category {
        id,
        name: payload.name,
        percentages: payload.percentages,
        genres: Vec::new(),
        status: payload.status,
    };
    categories.push(category.clone());
    Ok(Json(category))
}

async fn update_category(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation(
            vec![serde_json::json!({"field": "name", "error": "required"})],
            "category name must not be empty",
        ));
    }

    let mut categories = repo.write().await;
    let slot = categories
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or_else(|| AppError::not_found(format!("category {id} not found")))?;
    slot.name = payload.name;
    slot.percentages = payload.percentages;
    slot.status = payload.status;
    Ok(Json(slot.clone()))
}

fn seed_categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Văn học".to_string(),
            percentages: 10,
            genres: vec![
                GenreRef {
                    id: 1,
                    name: "Tiểu thuyết".to_string(),
                },
                GenreRef {
                    id: 2,
                    name: "Truyện ngắn".to_string(),
                },
            ],
            status: true,
        },
        Category {
            id: 2,
            name: "Kinh tế".to_string(),
            percentages: 2,
            genres: vec![
                GenreRef {
                    id: 3,
                    name: "Kinh tế chính trị".to_string(),
                },
                GenreRef {
                    id: 4,
                    name: "Kinh tế xã hội".to_string(),
                },
            ],
            status: false,
        },
        Category {
            id: 3,
            name: "Khoa học".to_string(),
            percentages: 5,
            genres: vec![
                GenreRef {
                    id: 5,
                    name: "Khoa học tự nhiên".to_string(),
                },
                GenreRef {
                    id: 6,
                    name: "Khoa học xã hội".to_string(),
                },
            ],
            status: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_touches_only_the_target_row() {
        let repo: Repo = Arc::new(RwLock::new(seed_categories()));
        let payload = CategoryPayload {
            name: "Văn học Việt Nam".to_string(),
            percentages: 12,
            status: true,
        };

        update_category(State(repo.clone()), Path(1), Json(payload))
            .await
            .unwrap();

        let categories = repo.read().await;
        assert_eq!(categories[0].name, "Văn học Việt Nam");
        assert_eq!(categories[1].name, "Kinh tế");
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let repo: Repo = Arc::new(RwLock::new(seed_categories()));
        let err = get_category(State(repo), Path(99)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
