//! Generation-tagged paging over the catalog.

use pushkind_common::repository::errors::RepositoryResult;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductListQuery};
use crate::repository::ProductReader;

/// Number of pages needed to show `total_count` items.
pub fn total_pages(total_count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_count.div_ceil(per_page)
}

/// One fetched page of products for a given filter generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub generation: u64,
    pub page: usize,
    pub per_page: usize,
    pub items: Vec<Product>,
    pub total_count: usize,
    pub total_pages: usize,
}

impl ProductPage {
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Progress of the feed served for the current generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub generation: u64,
    /// Last page delivered successfully.
    pub page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl PageCursor {
    pub fn from_page(page: &ProductPage) -> Self {
        Self {
            generation: page.generation,
            page: page.page,
            total_count: page.total_count,
            total_pages: page.total_pages,
        }
    }

    /// Whether every page of `generation` has been delivered.
    pub fn is_exhausted(&self, generation: u64) -> bool {
        self.generation == generation && self.page >= self.total_pages
    }
}

/// Answer to a "load more" request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextPage {
    Page(ProductPage),
    /// The last page was already delivered.
    Exhausted,
    /// The request was issued for an older generation and was ignored.
    Stale,
}

/// Fetch `page` of `query` and tag it with `generation`.
pub fn fetch_page<R>(
    repo: &R,
    query: &ProductListQuery,
    generation: u64,
    page: usize,
    per_page: usize,
) -> RepositoryResult<ProductPage>
where
    R: ProductReader + ?Sized,
{
    let page = page.max(1);
    let (total_count, items) = repo.list_products(query.clone().paginate(page, per_page))?;

    Ok(ProductPage {
        generation,
        page,
        per_page,
        items,
        total_count,
        total_pages: total_pages(total_count, per_page),
    })
}
