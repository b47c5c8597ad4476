// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - Store adapters only emit change snapshots, never domain events

pub mod document_store;
pub mod memory_document_store;
pub mod movie_documents;

pub use document_store::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, SnapshotCallback,
};
pub use memory_document_store::MemoryDocumentStore;
pub use movie_documents::{
    document_to_movie, documents_to_movies, movie_path, movie_to_fields, TIMESTAMP_FIELDS,
};

#[cfg(test)]
pub use document_store::MockDocumentStore;
