// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for the TMDB v3 API
// - Fixed locale, adult content excluded
// - Maps external data -> CatalogEntry (no persistence)
// - Used by CatalogService
//
// RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Non-2xx responses become AppError::Catalog carrying the status

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::CatalogEntry;
use crate::error::{AppError, AppResult};
use crate::integrations::catalog_api::CatalogApi;

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const LANGUAGE: &str = "en-US";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Listing wrapper
#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(default)]
    results: Vec<MovieData>,
}

/// Movie data from TMDB
#[derive(Debug, Deserialize)]
struct MovieData {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

/// TMDB API Client
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl TmdbClient {
    /// Create a client against the public API
    pub fn new(api_key: String) -> AppResult<Self> {
        Self::with_base_url(api_key, TMDB_BASE_URL.to_string())
    }

    /// Create a client against another base address (proxies, test servers)
    pub fn with_base_url(api_key: String, base_url: String) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("TMDB API key cannot be empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    async fn get_page(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Vec<CatalogEntry>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("TMDB {} returned status {}", path, status);
            return Err(AppError::Catalog {
                status: status.as_u16(),
            });
        }

        let page: PageData = response.json().await?;

        Ok(page.results.into_iter().map(Self::map_movie).collect())
    }

    /// Map MovieData to CatalogEntry
    fn map_movie(movie: MovieData) -> CatalogEntry {
        CatalogEntry {
            id: movie.id,
            title: movie
                .title
                .or(movie.original_title)
                .unwrap_or_default(),
            year: movie.release_date.as_deref().and_then(parse_year),
            poster_path: movie.poster_path.filter(|p| !p.is_empty()),
        }
    }
}

/// Year from a `YYYY-MM-DD` release date; empty or malformed dates give `None`
fn parse_year(release_date: &str) -> Option<i32> {
    release_date.get(0..4).and_then(|y| y.parse().ok())
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<CatalogEntry>> {
        log::debug!("Searching TMDB movies: {}", query);
        self.get_page("/search/movie", &[("include_adult", "false"), ("query", query)])
            .await
    }

    async fn popular_movies(&self) -> AppResult<Vec<CatalogEntry>> {
        log::debug!("Fetching TMDB popular movies");
        self.get_page("/movie/popular", &[("page", "1")]).await
    }
}
