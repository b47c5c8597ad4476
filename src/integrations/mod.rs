// src/integrations/mod.rs
//
// External Integrations Module
//
// Contracts for the three managed services, their REST adapters and an
// in-process identity provider for the memory backend.

pub mod catalog_api;
pub mod firebase;
pub mod identity_gateway;
pub mod local_identity;
pub mod tmdb;

pub use catalog_api::CatalogApi;
pub use firebase::{FirebaseEndpoints, FirebaseIdentityGateway, FirestoreDocumentStore};
pub use identity_gateway::{
    AccessTokenSource, FederatedCredentialSource, IdentityCallback, IdentityGateway,
};
pub use local_identity::LocalIdentityGateway;
pub use tmdb::client::TmdbClient;

#[cfg(test)]
pub use catalog_api::MockCatalogApi;
#[cfg(test)]
pub use identity_gateway::MockIdentityGateway;
