// src/domain/catalog.rs
//
// Catalog entries are produced fresh per search/listing call and never
// persisted locally.

use serde::{Deserialize, Serialize};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// A normalized catalog search/listing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog id
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_path: Option<String>,
}

/// Poster widths served by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PosterSize {
    Tiny,
    Thumb,
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
    Original,
}

impl PosterSize {
    pub fn token(&self) -> &'static str {
        match self {
            PosterSize::Tiny => "w92",
            PosterSize::Thumb => "w154",
            PosterSize::Small => "w185",
            PosterSize::Medium => "w342",
            PosterSize::Large => "w500",
            PosterSize::XLarge => "w780",
            PosterSize::Original => "original",
        }
    }
}

impl std::fmt::Display for PosterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Build the image CDN address for a poster path.
///
/// Returns `None` when there is no poster. Pure; never touches the network.
pub fn poster_url(path: Option<&str>, size: PosterSize) -> Option<String> {
    match path {
        Some(p) if !p.is_empty() => Some(format!("{}/{}{}", POSTER_BASE_URL, size.token(), p)),
        _ => None,
    }
}
