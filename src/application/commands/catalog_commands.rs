// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// Both commands share one result slot. A command whose request was
// superseded while in flight returns Ok(None) and leaves the slot alone.

use crate::application::{dto::*, error_handling::*, state::AppState};
use crate::domain::CatalogEntry;
use crate::error::AppResult;

fn apply(
    state: &AppState,
    ticket: crate::application::view_state::RequestTicket,
    result: AppResult<Vec<CatalogEntry>>,
    notice: &str,
) -> CommandResult<Option<Vec<MovieRowDto>>> {
    let mut view = state.view.lock();

    match result {
        Ok(entries) => {
            if !view.complete_request(ticket, entries) {
                return Ok(None);
            }
            Ok(Some(view.rows().into_iter().map(MovieRowDto::from).collect()))
        }
        Err(e) => {
            if !view.fail_request(ticket) {
                log::debug!("Ignoring failure of a superseded catalog request: {}", e);
                return Ok(None);
            }
            Err(ErrorResponse::from_app_error(e).with_message(notice))
        }
    }
}

/// Search the catalog; a blank query clears the results without a request
pub async fn search_movies(
    state: &AppState,
    query: &str,
) -> CommandResult<Option<Vec<MovieRowDto>>> {
    let ticket = state.view.lock().begin_request();
    let result = state.catalog_service.search(query).await;
    apply(state, ticket, result, "Search failed")
}

pub async fn list_popular(state: &AppState) -> CommandResult<Option<Vec<MovieRowDto>>> {
    let ticket = state.view.lock().begin_request();
    let result = state.catalog_service.list_popular().await;
    apply(state, ticket, result, "Could not load popular movies")
}
