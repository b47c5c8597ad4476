// src/services/watchlist_service.rs
//
// Watchlist Service
//
// RULES:
// - Every operation is keyed by a caller-supplied user id
// - A blank user id is a no-op that never reaches the store
// - createdAt is written once; updatedAt strictly advances on every write

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;

use crate::domain::{validate_saved_movie, CatalogEntry, SavedMovie, WatchStatus};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MovieRemoved, MovieSaved, Subscription, WatchlistCleared};
use crate::repositories::{
    document_to_movie, documents_to_movies, movie_path, movie_to_fields, CollectionPath,
    DocumentStore,
};

/// Receives the full list on initial load and on every change, or the store
/// error that kept the list from refreshing
pub type MoviesCallback = Box<dyn Fn(AppResult<Vec<SavedMovie>>) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct UpsertMovieRequest {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub poster_path: Option<String>,
    pub status: WatchStatus,
    /// Kept as-is when supplied; otherwise the stored value (or now) is used
    pub created_at: Option<DateTime<Utc>>,
}

impl UpsertMovieRequest {
    pub fn from_entry(entry: &CatalogEntry, status: WatchStatus) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            year: entry.year,
            poster_path: entry.poster_path.clone(),
            status,
            created_at: None,
        }
    }

    pub fn from_saved(saved: &SavedMovie, status: WatchStatus) -> Self {
        Self {
            id: saved.id,
            title: saved.title.clone(),
            year: saved.year,
            poster_path: saved.poster_path.clone(),
            status,
            created_at: Some(saved.created_at),
        }
    }
}

pub struct WatchlistService {
    store: Arc<dyn DocumentStore>,
    event_bus: Arc<EventBus>,
}

fn blank(user_id: &str) -> bool {
    user_id.trim().is_empty()
}

impl WatchlistService {
    pub fn new(store: Arc<dyn DocumentStore>, event_bus: Arc<EventBus>) -> Self {
        Self { store, event_bus }
    }

    /// Live view of the user's lists. The returned handle must be kept alive
    /// for as long as updates are wanted.
    pub fn subscribe(&self, user_id: &str, on_change: MoviesCallback) -> Subscription {
        if blank(user_id) {
            return Subscription::inert();
        }

        self.store.subscribe_collection(
            &CollectionPath::user_movies(user_id),
            Box::new(move |snapshot| {
                on_change(snapshot.map(|documents| documents_to_movies(&documents)))
            }),
        )
    }

    pub async fn upsert(&self, user_id: &str, request: UpsertMovieRequest) -> AppResult<()> {
        if blank(user_id) {
            return Ok(());
        }

        let path = movie_path(user_id, request.id);
        let existing = match self.store.get(&path).await? {
            Some(document) => Some(document_to_movie(&document)?),
            None => None,
        };

        let mut now = Utc::now();
        if let Some(previous) = &existing {
            if previous.updated_at >= now {
                now = previous.updated_at + Duration::microseconds(1);
            }
        }

        let created_at = request
            .created_at
            .or_else(|| existing.as_ref().map(|m| m.created_at))
            .unwrap_or(now);

        let movie = SavedMovie {
            id: request.id,
            title: request.title,
            year: request.year,
            poster_path: request.poster_path,
            status: request.status,
            created_at,
            updated_at: now.max(created_at),
        };

        validate_saved_movie(&movie)?;
        self.store.write_merge(&path, movie_to_fields(&movie)?).await?;

        log::info!("Saved movie {} for {} as {}", movie.id, user_id, movie.status);
        self.event_bus
            .emit(MovieSaved::new(user_id.to_string(), movie.id, movie.status));

        Ok(())
    }

    /// Move an existing record to the other list
    pub async fn set_status(
        &self,
        user_id: &str,
        saved: &SavedMovie,
        status: WatchStatus,
    ) -> AppResult<()> {
        self.upsert(user_id, UpsertMovieRequest::from_saved(saved, status))
            .await
    }

    /// Absent records are not an error and emit nothing
    pub async fn remove(&self, user_id: &str, movie_id: u64) -> AppResult<()> {
        if blank(user_id) {
            return Ok(());
        }

        let removed = self.store.delete(&movie_path(user_id, movie_id)).await?;
        if !removed {
            log::debug!("Movie {} of {} was already gone", movie_id, user_id);
            return Ok(());
        }

        log::info!("Removed movie {} for {}", movie_id, user_id);
        self.event_bus
            .emit(MovieRemoved::new(user_id.to_string(), movie_id));

        Ok(())
    }

    /// Delete every record of the user. Deletions run concurrently; the call
    /// succeeds only when all of them did. Returns how many were removed.
    pub async fn delete_all(&self, user_id: &str) -> AppResult<usize> {
        if blank(user_id) {
            return Ok(0);
        }

        let collection = CollectionPath::user_movies(user_id);
        let documents = self.store.list_children(&collection).await?;
        let total = documents.len();

        let results = join_all(documents.iter().map(|document| {
            let path = collection.doc(document.id.clone());
            async move { self.store.delete(&path).await }
        }))
        .await;

        let failures: Vec<AppError> = results.into_iter().filter_map(Result::err).collect();
        if !failures.is_empty() {
            for error in &failures {
                log::error!("Deleting a movie of {} failed: {}", user_id, error);
            }
            return Err(AppError::Store(format!(
                "Failed to delete {} of {} movies",
                failures.len(),
                total
            )));
        }

        log::info!("Deleted {} movies for {}", total, user_id);
        self.event_bus
            .emit(WatchlistCleared::new(user_id.to_string(), total));

        Ok(total)
    }
}
