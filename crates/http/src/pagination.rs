//! Shared pagination contract for the console's table endpoints.
//!
//! Every listing accepts `{page, size, name?}` and answers with
//! `{data, metadata}` where metadata carries the totals the table widgets
//! page with.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 10;

/// Query parameters accepted by paginated listings.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "PageQuery::default_page")]
    pub page: u32,
    #[serde(default = "PageQuery::default_size")]
    pub size: u32,
    /// Case-insensitive name filter applied before paging.
    pub name: Option<String>,
}

impl PageQuery {
    fn default_page() -> u32 {
        DEFAULT_PAGE
    }

    fn default_size() -> u32 {
        DEFAULT_SIZE
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_count: u64,
    pub total_pages: u32,
    pub page: u32,
    pub size: u32,
}

/// One page of results plus the metadata describing the whole set.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}

/// Slice one page out of an already-filtered result set.
///
/// Pages are 1-based; a page past the end yields an empty `data` with the
/// metadata still describing the full set.
pub fn paginate<T: Clone>(items: &[T], query: &PageQuery) -> Paginated<T> {
    let size = query.size.max(1);
    let page = query.page.max(1);

    let total_count = items.len() as u64;
    let total_pages = total_count.div_ceil(u64::from(size)) as u32;

    let start = (page - 1) as usize * size as usize;
    let data = items
        .iter()
        .skip(start)
        .take(size as usize)
        .cloned()
        .collect();

    Paginated {
        data,
        metadata: PageMetadata {
            total_count,
            total_pages,
            page,
            size,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: u32, size: u32) -> PageQuery {
        PageQuery {
            page,
            size,
            name: None,
        }
    }

    #[test]
    fn pages_are_one_based_and_totals_round_up() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(&items, &query(1, 10));
        assert_eq!(first.data, (1..=10).collect::<Vec<u32>>());
        assert_eq!(first.metadata.total_count, 25);
        assert_eq!(first.metadata.total_pages, 3);

        let last = paginate(&items, &query(3, 10));
        assert_eq!(last.data, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn out_of_range_page_is_empty_but_keeps_metadata() {
        let items = vec!["a", "b"];
        let result = paginate(&items, &query(9, 10));
        assert!(result.data.is_empty());
        assert_eq!(result.metadata.total_count, 2);
        assert_eq!(result.metadata.total_pages, 1);
    }

    #[test]
    fn zero_size_is_clamped_instead_of_dividing_by_zero() {
        let items = vec![1, 2, 3];
        let result = paginate(&items, &query(1, 0));
        assert_eq!(result.metadata.size, 1);
        assert_eq!(result.data, vec![1]);
    }
}
