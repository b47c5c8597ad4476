// src/integrations/catalog_api.rs
//
// Catalog API contract: raw lookups against the movie metadata service.
// Query hygiene (trimming, empty checks) lives in CatalogService.

use async_trait::async_trait;

use crate::domain::CatalogEntry;
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// One keyword lookup. `query` is already trimmed and non-empty.
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogEntry>>;

    /// First page of the popular listing
    async fn popular_movies(&self) -> AppResult<Vec<CatalogEntry>>;
}
