//! Remote Data Access boundary: typed, read-only reads from the Boek
//! catalog API.
//!
//! The console core never talks HTTP itself; it consumes the
//! [`CatalogSource`] trait. [`RemoteCatalog`] implements it against the
//! production API, [`StaticCatalog`] against fixtures held in memory (used
//! by the local environment and by tests). No retries and no caching live
//! here beyond the genre memoization the wizard's combobox leans on.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;

use boek_draft::picker::filter_by;
use boek_draft::{BookSummary, Genre};

/// Failure at the catalog boundary. Dependent screens stay in their
/// loading/empty state; no retry policy is defined here.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Listing request accepted by the paginated catalog endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub page: u32,
    pub size: u32,
    pub name: Option<String>,
}

impl ListingQuery {
    /// One big page, the way the console pulls candidate lists for pickers.
    pub fn all(size: u32) -> Self {
        Self {
            page: 1,
            size,
            name: None,
        }
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub metadata: ListingMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMetadata {
    pub total_count: u64,
    pub total_pages: u32,
}

/// Thin reference rows for the non-book listings the console embeds in
/// selects and tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
}

/// Read-only view of the catalog, as the wizard and pickers consume it.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// `GET /genres/child-genres`: ordered, unpaginated genre sequence.
    async fn child_genres(&self) -> Result<Vec<Genre>>;

    /// Paginated book listing, the candidate feed for the series picker.
    async fn books(&self, query: &ListingQuery) -> Result<Listing<BookSummary>>;

    async fn publishers(&self, query: &ListingQuery) -> Result<Listing<NamedRef>>;

    async fn authors(&self, query: &ListingQuery) -> Result<Listing<NamedRef>>;

    async fn categories(&self, query: &ListingQuery) -> Result<Listing<NamedRef>>;
}

/// Client for the production catalog API.
pub struct RemoteCatalog {
    base_url: String,
    client: reqwest::Client,
    // The genre list backs every combobox on the wizard; one fetch per
    // client instance is plenty.
    genres: OnceCell<Vec<Genre>>,
}

impl RemoteCatalog {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
            genres: OnceCell::new(),
        })
    }

    fn listing_params(query: &ListingQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
        ];
        if let Some(name) = &query.name {
            params.push(("name", name.clone()));
        }
        params
    }

    async fn fetch_listing<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &ListingQuery,
    ) -> Result<Listing<T>> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, page = query.page, size = query.size, "fetching catalog listing");

        let listing = self
            .client
            .get(&url)
            .query(&Self::listing_params(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(listing)
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    async fn child_genres(&self) -> Result<Vec<Genre>> {
        let genres = self
            .genres
            .get_or_try_init(|| async {
                let url = format!("{}/genres/child-genres", self.base_url);
                tracing::debug!(%url, "fetching child genres");

                let genres: Vec<Genre> = self
                    .client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok::<_, CatalogError>(genres)
            })
            .await?;
        Ok(genres.clone())
    }

    async fn books(&self, query: &ListingQuery) -> Result<Listing<BookSummary>> {
        self.fetch_listing("books", query).await
    }

    async fn publishers(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        self.fetch_listing("publishers", query).await
    }

    async fn authors(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        self.fetch_listing("authors", query).await
    }

    async fn categories(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        self.fetch_listing("categories", query).await
    }
}

/// In-memory catalog used by the local environment and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    pub genres: Vec<Genre>,
    pub books: Vec<BookSummary>,
    pub publishers: Vec<NamedRef>,
    pub authors: Vec<NamedRef>,
    pub categories: Vec<NamedRef>,
}

fn page_of<T: Clone>(items: Vec<T>, query: &ListingQuery) -> Listing<T> {
    let size = query.size.max(1);
    let page = query.page.max(1);
    let total_count = items.len() as u64;
    let total_pages = total_count.div_ceil(u64::from(size)) as u32;

    let start = (page - 1) as usize * size as usize;
    let data = items.into_iter().skip(start).take(size as usize).collect();

    Listing {
        data,
        metadata: ListingMetadata {
            total_count,
            total_pages,
        },
    }
}

fn filtered<T: Clone>(items: &[T], query: &ListingQuery, label: impl Fn(&T) -> &str) -> Vec<T> {
    match &query.name {
        Some(name) => filter_by(items, name, label).into_iter().cloned().collect(),
        None => items.to_vec(),
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn child_genres(&self) -> Result<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    async fn books(&self, query: &ListingQuery) -> Result<Listing<BookSummary>> {
        Ok(page_of(
            filtered(&self.books, query, |book| &book.name),
            query,
        ))
    }

    async fn publishers(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        Ok(page_of(
            filtered(&self.publishers, query, |p| &p.name),
            query,
        ))
    }

    async fn authors(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        Ok(page_of(filtered(&self.authors, query, |a| &a.name), query))
    }

    async fn categories(&self, query: &ListingQuery) -> Result<Listing<NamedRef>> {
        Ok(page_of(
            filtered(&self.categories, query, |c| &c.name),
            query,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog {
            books: vec![
                BookSummary {
                    id: 1,
                    code: "B00001".to_string(),
                    name: "Dế Mèn phiêu lưu ký".to_string(),
                    image_url: None,
                    publisher: "Kim Đồng".to_string(),
                    cover_price: 45_000.0,
                    released_year: 2015,
                },
                BookSummary {
                    id: 2,
                    code: "B00002".to_string(),
                    name: "Kính Vạn Hoa".to_string(),
                    image_url: None,
                    publisher: "Trẻ".to_string(),
                    cover_price: 60_000.0,
                    released_year: 2018,
                },
            ],
            ..StaticCatalog::default()
        }
    }

    #[tokio::test]
    async fn name_filter_applies_before_paging() {
        let source = catalog();
        let listing = source
            .books(&ListingQuery {
                page: 1,
                size: 10,
                name: Some("kính".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].id, 2);
        assert_eq!(listing.metadata.total_count, 1);
    }

    #[tokio::test]
    async fn paging_reports_totals_for_the_filtered_set() {
        let source = catalog();
        let listing = source.books(&ListingQuery::all(1)).await.unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.metadata.total_count, 2);
        assert_eq!(listing.metadata.total_pages, 2);
    }
}
