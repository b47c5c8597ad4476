// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between the UI (terminal shell) and the services
// - Translates between DTOs and domain values
// - Turns every error into a user notice

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;
pub mod view_state;


pub use commands::*;
pub use dto::*;
pub use error_handling::{CommandResult, ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
pub use view_state::{MovieRow, RequestTicket, Tab, ViewState};
