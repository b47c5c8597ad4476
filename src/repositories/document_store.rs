// src/repositories/document_store.rs
//
// Document Store contract
//
// Paths are slash-separated and alternate collection/document segments:
// `users/{userId}/movies/{externalId}`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::events::Subscription;

/// Field set of a single document
pub type Fields = Map<String, Value>;

/// Receives the full collection snapshot on initial load and after every
/// change, or the error that stopped the store from reading it
pub type SnapshotCallback = Box<dyn Fn(AppResult<Vec<Document>>) + Send + Sync>;

/// A stored document as seen through the contract
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Path of a collection (odd number of segments)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

/// Path of a document (even number of segments)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl CollectionPath {
    /// `users/{user_id}/movies`
    pub fn user_movies(user_id: &str) -> Self {
        Self(format!("users/{}/movies", user_id))
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Remote per-user structured storage with live subscriptions.
///
/// Implementations are dumb: no business rules, no invariant checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or update; listed fields replace, other fields are kept.
    async fn write_merge(&self, path: &DocumentPath, fields: Fields) -> AppResult<()>;

    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>>;

    /// Deleting a missing document succeeds with `false`.
    async fn delete(&self, path: &DocumentPath) -> AppResult<bool>;

    async fn list_children(&self, collection: &CollectionPath) -> AppResult<Vec<Document>>;

    /// Open a live subscription. Snapshots arrive in store order, starting
    /// with the current contents. A read failure is delivered as `Err` and the
    /// subscription stays open.
    fn subscribe_collection(
        &self,
        collection: &CollectionPath,
        callback: SnapshotCallback,
    ) -> Subscription;
}
