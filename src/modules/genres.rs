//! Child-genre listing consumed by the wizard's genre combobox.
//!
//! Mirrors the platform's `/genres/child-genres` endpoint: an ordered,
//! unpaginated sequence of the active leaf genres.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};

use boek_draft::Genre;
use boek_kernel::{InitCtx, Module};

pub struct GenresModule {
    genres: Arc<Vec<Genre>>,
}

impl GenresModule {
    pub fn new() -> Self {
        Self {
            genres: Arc::new(seed()),
        }
    }
}

impl Default for GenresModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            genres = self.genres.len(),
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/child-genres", get(child_genres))
            .with_state(self.genres.clone())
    }
}

async fn child_genres(State(genres): State<Arc<Vec<Genre>>>) -> Json<Vec<Genre>> {
    let mut active: Vec<Genre> = genres.iter().filter(|genre| genre.active).cloned().collect();
    active.sort_by_key(|genre| genre.display_index);
    Json(active)
}

/// Genre fixtures shared with the local candidate catalog.
pub fn seed() -> Vec<Genre> {
    let rows: [(u64, &str, Option<u64>, u32, bool); 7] = [
        (1, "Tiểu thuyết", Some(10), 1, true),
        (2, "Truyện ngắn", Some(10), 2, true),
        (3, "Thiếu nhi", Some(10), 3, true),
        (4, "Kinh tế chính trị", Some(20), 4, true),
        (5, "Kinh tế xã hội", Some(20), 5, true),
        (6, "Khoa học tự nhiên", Some(30), 6, true),
        (7, "Sách cũ", Some(10), 7, false),
    ];

    rows.iter()
        .map(|(id, name, parent_id, index, active)| Genre {
            id: *id,
            name: name.to_string(),
            parent_id: *parent_id,
            display_index: Some(*index),
            active: *active,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inactive_genres_are_hidden_and_order_follows_display_index() {
        let genres = Arc::new(seed());
        let Json(listed) = child_genres(State(genres)).await;

        assert_eq!(listed.len(), 6);
        assert!(listed.iter().all(|genre| genre.active));
        let indices: Vec<Option<u32>> = listed.iter().map(|g| g.display_index).collect();
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
    }
}
