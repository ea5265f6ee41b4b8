//! Author management, reachable by both console roles: admins curate the
//! list, issuers read it when authoring books.

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
use boek_kernel::{InitCtx, Module};

use crate::utils::avatar_from_name;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub name: String,
    pub image_url: Option<String>,
}

type Repo = Arc<RwLock<Vec<Author>>>;

pub struct AuthorsModule {
    repo: Repo,
}

impl AuthorsModule {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(RwLock::new(seed_authors())),
        }
    }
}

impl Default for AuthorsModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_authors).post(create_author))
            .route("/{id}", get(get_author).put(update_author))
            .with_state(self.repo.clone())
    }
}

async fn list_authors(
    State(repo): State<Repo>,
    Query(query): Query<PageQuery>,
) -> Json<Paginated<Author>> {
    let authors = repo.read().await;
    let matches: Vec<Author> = match &query.name {
        Some(name) => filter_by(&authors, name, |author| &author.name)
            .into_iter()
            .cloned()
            .collect(),
        None => authors.clone(),
    };
    Json(paginate(&matches, &query))
}

async fn get_author(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
) -> Result<Json<Author>, AppError> {
    let authors = repo.read().await;
    authors
        .iter()
        .find(|author| author.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("author {id} not found")))
}

async fn create_author(
    State(repo): State<Repo>,
    Json(payload): Json<AuthorPayload>,
) -> Result<Json<Author>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation(
            vec![serde_json::json!({"field": "name", "error": "required"})],
            "author name must not be empty",
        ));
    }

    let mut authors = repo.write().await;
    let id = authors.iter().map(|a| a.id).max().unwrap_or(0) + 1;
    let author = Author {
        id,
        image_url: payload
            .image_url
            .unwrap_or_else(|| avatar_from_name(&payload.name)),
        name: payload.name,
    };
    authors.push(author.clone());
    Ok(Json(author))
}

async fn update_author(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
    Json(payload): Json<AuthorPayload>,
) -> Result<Json<Author>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation(
            vec![serde_json::json!({"field": "name", "error": "required"})],
            "author name must not be empty",
        ));
    }

    let mut authors = repo.write().await;
    let slot = authors
        .iter_mut()
        .find(|author| author.id == id)
        .ok_or_else(|| AppError::not_found(format!("author {id} not found")))?;
    slot.image_url = payload
        .image_url
        .unwrap_or_else(|| avatar_from_name(&payload.name));
    slot.name = payload.name;
    Ok(Json(slot.clone()))
}

fn seed_authors() -> Vec<Author> {
    ["Tô Hoài", "Nguyễn Nhật Ánh", "Vũ Trọng Phụng", "Phùng Quán"]
        .iter()
        .enumerate()
        .map(|(index, name)| Author {
            id: index as u64 + 1,
            name: name.to_string(),
            image_url: avatar_from_name(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_authors_are_listed() {
        let repo: Repo = Arc::new(RwLock::new(seed_authors()));
        create_author(
            State(repo.clone()),
            Json(AuthorPayload {
                name: "Đoàn Giỏi".to_string(),
                image_url: None,
            }),
        )
        .await
        .unwrap();

        let Json(page) = list_authors(State(repo), Query(PageQuery::default())).await;
        assert_eq!(page.metadata.total_count, 5);
    }
}
