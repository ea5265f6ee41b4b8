//! Admin-facing publisher management.

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

use crate::utils::avatar_from_name;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherPayload {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub image_url: Option<String>,
}

impl PublisherPayload {
    fn violations(&self) -> Vec<serde_json::Value> {
        let mut details = Vec::new();
        if self.name.trim().is_empty() {
            details.push(serde_json::json!({"field": "name", "error": "required"}));
        }
        if self.email.trim().is_empty() {
            details.push(serde_json::json!({"field": "email", "error": "required"}));
        }
        details
    }

    fn into_publisher(self, id: u64) -> Publisher {
        let image_url = self
            .image_url
            .unwrap_or_else(|| avatar_from_name(&self.name));
        Publisher {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            phone_number: self.phone_number,
            image_url,
        }
    }
}

type Repo = Arc<RwLock<Vec<Publisher>>>;

pub struct PublishersModule {
    repo: Repo,
}

impl PublishersModule {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(RwLock::new(seed_publishers())),
        }
    }
}

impl Default for PublishersModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for PublishersModule {
    fn name(&self) -> &'static str {
        "publishers"
    }

    fn access(&self) -> RouteAccess {
        SYSTEM_ONLY
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "publishers module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_publishers).post(create_publisher))
            .route("/{id}", get(get_publisher).put(update_publisher).delete(delete_publisher))
            .with_state(self.repo.clone())
    }
}

async fn list_publishers(
    State(repo): State<Repo>,
    Query(query): Query<PageQuery>,
) -> Json<Paginated<Publisher>> {
    let publishers = repo.read().await;
    let matches: Vec<Publisher> = match &query.name {
        Some(name) => filter_by(&publishers, name, |publisher| &publisher.name)
            .into_iter()
            .cloned()
            .collect(),
        None => publishers.clone(),
    };
    Json(paginate(&matches, &query))
}

async fn get_publisher(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
) -> Result<Json<Publisher>, AppError> {
    let publishers = repo.read().await;
    publishers
        .iter()
        .find(|publisher| publisher.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("publisher {id} not found")))
}

async fn create_publisher(
    State(repo): State<Repo>,
    Json(payload): Json<PublisherPayload>,
) -> Result<Json<Publisher>, AppError> {
    let violations = payload.violations();
    if !violations.is_empty() {
        return Err(AppError::validation(
            violations,
            "publisher payload is not valid",
        ));
    }

    let mut publishers = repo.write().await;
    let id = publishers.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let publisher = payload.into_publisher(id);
    publishers.push(publisher.clone());
    Ok(Json(publisher))
}

async fn update_publisher(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
    Json(payload): Json<PublisherPayload>,
) -> Result<Json<Publisher>, AppError> {
    let violations = payload.violations();
    if !violations.is_empty() {
        return Err(AppError::validation(
            violations,
            "publisher payload is not valid",
        ));
    }

    let mut publishers = repo.write().await;
    let slot = publishers
        .iter_mut()
        .find(|publisher| publisher.id == id)
        .ok_or_else(|| AppError::not_found(format!("publisher {id} not found")))?;
    *slot = payload.into_publisher(id);
    Ok(Json(slot.clone()))
}

async fn delete_publisher(
    State(repo): State<Repo>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut publishers = repo.write().await;
    let index = publishers
        .iter()
        .position(|publisher| publisher.id == id)
        .ok_or_else(|| AppError::not_found(format!("publisher {id} not found")))?;
    publishers.remove(index);
    Ok(Json(serde_json::json!({"deleted": id})))
}

fn seed_publishers() -> Vec<Publisher> {
    let rows = [
        ("NXB Kim Đồng", "lienhe@nxbkimdong.com.vn", "55 Quang Trung, Hà Nội", "024-3943-4730"),
        ("NXB Trẻ", "hopthubandoc@nxbtre.com.vn", "161B Lý Chính Thắng, TP.HCM", "028-3931-6289"),
        ("NXB Văn học", "info@nxbvanhoc.com.vn", "18 Nguyễn Trường Tộ, Hà Nội", "024-3716-1518"),
    ];

    rows.iter()
        .enumerate()
        .map(|(index, (name, email, address, phone))| Publisher {
            id: index as u64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            phone_number: phone.to_string(),
            image_url: avatar_from_name(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_image_falls_back_to_an_avatar() {
        let repo: Repo = Arc::new(RwLock::new(Vec::new()));
        let payload = PublisherPayload {
            name: "NXB Giáo dục".to_string(),
            email: "contact@nxbgd.vn".to_string(),
            address: "81 Trần Hưng Đạo, Hà Nội".to_string(),
            phone_number: "024-3822-0801".to_string(),
            image_url: None,
        };

        let Json(publisher) = create_publisher(State(repo), Json(payload)).await.unwrap();
        assert!(publisher.image_url.starts_with("https://ui-avatars.com/"));
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let repo: Repo = Arc::new(RwLock::new(seed_publishers()));
        let query = PageQuery {
            page: 1,
            size: 10,
            name: Some("kim đồng".to_string()),
        };

        let Json(page) = list_publishers(State(repo), Query(query)).await;
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "NXB Kim Đồng");
    }
}
