// src/services/catalog_service.rs
//
// Catalog Client - stateless search/listing over the catalog API

use std::sync::Arc;

use crate::domain::{poster_url, CatalogEntry, PosterSize};
use crate::error::AppResult;
use crate::integrations::CatalogApi;

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Keyword search. Blank terms return nothing without a request.
    pub async fn search(&self, term: &str) -> AppResult<Vec<CatalogEntry>> {
        let query = term.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.api.search_movies(query).await?;
        log::debug!("Search '{}' returned {} results", query, results.len());
        Ok(results)
    }

    /// First page of the popular listing
    pub async fn list_popular(&self) -> AppResult<Vec<CatalogEntry>> {
        self.api.popular_movies().await
    }

    pub fn poster_url(&self, path: Option<&str>, size: PosterSize) -> Option<String> {
        poster_url(path, size)
    }
}
