// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod account_deletion;
pub mod auth_service;
pub mod catalog_service;
pub mod session_controller;
pub mod watchlist_service;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod account_deletion_tests;

// Re-export all services and their types
pub use account_deletion::{
    AccountDeletionWorkflow,
    DeletionOutcome,
    DeletionPrompter,
    DeletionState,
    SIGN_IN_AGAIN_NOTICE,
};

pub use auth_service::{
    AuthService,
    SignUpRequest,
    MIN_PASSWORD_LENGTH,
};

pub use catalog_service::CatalogService;

pub use session_controller::SessionController;

pub use watchlist_service::{
    MoviesCallback,
    UpsertMovieRequest,
    WatchlistService,
};
