// src/repositories/movie_documents.rs
//
// SavedMovie <-> Document mapping. No business rules here.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{SavedMovie, WatchStatus};
use crate::error::{AppError, AppResult};
use crate::repositories::document_store::{CollectionPath, Document, DocumentPath, Fields};

/// Fields holding RFC 3339 instants, for stores with a native timestamp type
pub const TIMESTAMP_FIELDS: &[&str] = &["createdAt", "updatedAt"];

/// `users/{user_id}/movies/{movie_id}`
pub fn movie_path(user_id: &str, movie_id: u64) -> DocumentPath {
    CollectionPath::user_movies(user_id).doc(movie_id.to_string())
}

pub fn movie_to_fields(movie: &SavedMovie) -> AppResult<Fields> {
    match serde_json::to_value(movie)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(AppError::Store(format!(
            "SavedMovie serialized to a non-object: {}",
            other
        ))),
    }
}

/// Stored shape, lenient about fields written by older clients
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMovie {
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    poster_path: Option<String>,
    status: WatchStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

pub fn document_to_movie(document: &Document) -> AppResult<SavedMovie> {
    let id: u64 = document
        .id
        .parse()
        .map_err(|_| AppError::Store(format!("Invalid movie document id: {}", document.id)))?;

    let stored: StoredMovie =
        serde_json::from_value(serde_json::Value::Object(document.fields.clone()))?;

    let updated_at = stored.updated_at.or(stored.created_at).unwrap_or_default();
    let created_at = stored.created_at.unwrap_or(updated_at);

    Ok(SavedMovie {
        id,
        title: stored.title,
        year: stored.year,
        poster_path: stored.poster_path,
        status: stored.status,
        created_at,
        updated_at,
    })
}

/// Map a snapshot, skipping (and logging) documents that do not decode.
pub fn documents_to_movies(documents: &[Document]) -> Vec<SavedMovie> {
    documents
        .iter()
        .filter_map(|doc| match document_to_movie(doc) {
            Ok(movie) => Some(movie),
            Err(e) => {
                log::warn!("Skipping malformed movie document {}: {}", doc.id, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_path() {
        assert_eq!(movie_path("u1", 603).to_string(), "users/u1/movies/603");
    }

    #[test]
    fn test_fields_decode_back() {
        let now = Utc::now();
        let movie = SavedMovie {
            id: 603,
            title: "The Matrix".to_string(),
            year: Some(1999),
            poster_path: None,
            status: WatchStatus::Watched,
            created_at: now,
            updated_at: now,
        };

        let doc = Document::new("603", movie_to_fields(&movie).unwrap());
        assert_eq!(document_to_movie(&doc).unwrap(), movie);
    }

    #[test]
    fn test_missing_timestamps_are_tolerated() {
        let doc = Document::new(
            "12",
            json!({"title": "Old", "status": "toWatch"})
                .as_object()
                .cloned()
                .unwrap(),
        );

        let movie = document_to_movie(&doc).unwrap();
        assert_eq!(movie.id, 12);
        assert_eq!(movie.created_at, movie.updated_at);
    }

    #[test]
    fn test_malformed_documents_are_skipped() {
        let good = Document::new(
            "1",
            json!({"title": "A", "status": "watched"}).as_object().cloned().unwrap(),
        );
        let bad_id = Document::new(
            "abc",
            json!({"title": "B", "status": "watched"}).as_object().cloned().unwrap(),
        );
        let bad_status = Document::new(
            "2",
            json!({"title": "C", "status": "someday"}).as_object().cloned().unwrap(),
        );

        let movies = documents_to_movies(&[good, bad_id, bad_status]);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "A");
    }
}
