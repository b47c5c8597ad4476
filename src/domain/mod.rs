// src/domain/mod.rs
//
// Domain Root
//
// Declares the domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

pub mod catalog;
pub mod identity;
pub mod movie;

pub use catalog::{poster_url, CatalogEntry, PosterSize, POSTER_BASE_URL};
pub use identity::{Identity, LinkedProvider, Session};
pub use movie::{validate_saved_movie, SavedMovie, WatchStatus};

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unknown watch status: {0}")]
    UnknownStatus(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
