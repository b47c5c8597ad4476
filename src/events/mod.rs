// src/events/mod.rs
//
// Internal Event System - Public API
//
// EventHandler is internal to the bus and not exported.

pub mod bus;
pub mod subscription;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Identity
    AccountDeleted,
    IdentityStateChanged,
    // Store
    CollectionChanged,
    // Watchlist
    MovieRemoved,
    MovieSaved,
    WatchlistCleared,
};

pub use bus::{EventBus, EventLogEntry};
pub use subscription::Subscription;

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
