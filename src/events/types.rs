// src/events/types.rs
//
// All events in the system.
// Each event represents an immutable fact that has already occurred.
//
// RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Identity, WatchStatus};
use crate::repositories::Document;

/// Trait that all events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// IDENTITY EVENTS
// ============================================================================

/// Emitted by an identity gateway on sign-in, sign-out, and account removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityStateChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub identity: Option<Identity>,
}

impl IdentityStateChanged {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            identity,
        }
    }
}

impl DomainEvent for IdentityStateChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "IdentityStateChanged" }
}

/// Emitted after an account and its lists were removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub reauthenticated: bool,
}

impl AccountDeleted {
    pub fn new(user_id: String, reauthenticated: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            reauthenticated,
        }
    }
}

impl DomainEvent for AccountDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "AccountDeleted" }
}

// ============================================================================
// STORE EVENTS
// ============================================================================

/// Emitted by the in-process store whenever a collection changes.
/// Carries the full snapshot, not a delta.
#[derive(Debug, Clone)]
pub struct CollectionChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub collection: String,
    pub documents: Vec<Document>,
}

impl CollectionChanged {
    pub fn new(collection: String, documents: Vec<Document>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            collection,
            documents,
        }
    }
}

impl DomainEvent for CollectionChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CollectionChanged" }
}

// ============================================================================
// WATCHLIST EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: u64,
    pub status: WatchStatus,
}

impl MovieSaved {
    pub fn new(user_id: String, movie_id: u64, status: WatchStatus) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
            status,
        }
    }
}

impl DomainEvent for MovieSaved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieSaved" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub movie_id: u64,
}

impl MovieRemoved {
    pub fn new(user_id: String, movie_id: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            movie_id,
        }
    }
}

impl DomainEvent for MovieRemoved {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieRemoved" }
}

/// Emitted when every record of a user was deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub removed: usize,
}

impl WatchlistCleared {
    pub fn new(user_id: String, removed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            removed,
        }
    }
}

impl DomainEvent for WatchlistCleared {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "WatchlistCleared" }
}
