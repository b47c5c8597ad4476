// src/integrations/firebase/mod.rs
//
// Firebase REST adapters: Identity Toolkit for accounts, Firestore for lists.

pub mod auth;
pub mod firestore;
pub mod values;

pub use auth::{FirebaseEndpoints, FirebaseIdentityGateway};
pub use firestore::FirestoreDocumentStore;
