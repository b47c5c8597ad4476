// src/lib.rs
// Movie Watchlist - personal to-watch / watched lists over a movie catalog
//
// Architecture:
// - Domain-centric: movie, identity and catalog values with their invariants
// - Contract-first: identity, storage and catalog are traits; REST adapters
//   and an in-process store implement them
// - Event-driven: identity changes, store snapshots and list edits flow
//   through a typed event bus
// - Application Layer: commands are the UI boundary and the error boundary

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod logging;
pub mod repositories;
pub mod services;

// ============================================================================
// INTEGRATIONS & APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    poster_url,
    validate_saved_movie,
    CatalogEntry,
    Identity,
    LinkedProvider,
    PosterSize,
    SavedMovie,
    Session,
    WatchStatus,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, AuthErrorKind};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    AccountDeleted,
    CollectionChanged,
    DomainEvent,
    EventBus,
    EventLogEntry,
    IdentityStateChanged,
    MovieRemoved,
    MovieSaved,
    Subscription,
    WatchlistCleared,
};

// ============================================================================
// PUBLIC API - Storage
// ============================================================================

pub use repositories::{CollectionPath, Document, DocumentPath, DocumentStore, MemoryDocumentStore};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    CatalogApi,
    FederatedCredentialSource,
    FirebaseIdentityGateway,
    FirestoreDocumentStore,
    IdentityGateway,
    LocalIdentityGateway,
    TmdbClient,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AccountDeletionWorkflow,
    AuthService,
    CatalogService,
    DeletionOutcome,
    DeletionPrompter,
    DeletionState,
    SessionController,
    UpsertMovieRequest,
    WatchlistService,
};

// ============================================================================
// PUBLIC API - Application
// ============================================================================

pub use application::{AppState, CommandResult, ErrorResponse, ErrorType, Tab, ViewState};
pub use config::{AppConfig, StoreBackend};
