use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// A movie on one of the user's lists.
///
/// Keyed by (user, catalog id). The document store owns the record; the
/// client only holds a live read-only projection of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMovie {
    /// Catalog id, also the document id
    pub id: u64,

    pub title: String,

    /// Release year (if known)
    pub year: Option<i32>,

    /// Poster path on the image CDN (if any)
    pub poster_path: Option<String>,

    /// Which list the movie is on
    pub status: WatchStatus,

    /// First time the record was written; never changes afterwards
    pub created_at: DateTime<Utc>,

    /// Last write
    pub updated_at: DateTime<Utc>,
}

/// The two personal lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WatchStatus {
    ToWatch,
    Watched,
}

impl SavedMovie {
    /// Document id under the user's collection.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::ToWatch => "toWatch",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WatchStatus::ToWatch => "To watch",
            WatchStatus::Watched => "Watched",
        }
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toWatch" => Ok(WatchStatus::ToWatch),
            "watched" => Ok(WatchStatus::Watched),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}
