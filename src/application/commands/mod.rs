// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the UI and the services
// - Commands accept DTOs / plain values, return DTOs
// - Commands convert every error into an ErrorResponse
// - Commands NEVER contain business logic

pub mod account_commands;
pub mod auth_commands;
pub mod catalog_commands;
pub mod view_commands;
pub mod watchlist_commands;

pub use account_commands::*;
pub use auth_commands::*;
pub use catalog_commands::*;
pub use view_commands::*;
pub use watchlist_commands::*;
