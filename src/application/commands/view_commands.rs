// src/application/commands/view_commands.rs
//
// Tab switching and the rows of the active tab

use crate::application::{dto::*, error_handling::*, state::AppState, view_state::Tab};

pub fn current_rows(state: &AppState) -> Vec<MovieRowDto> {
    state
        .view
        .lock()
        .rows()
        .into_iter()
        .map(MovieRowDto::from)
        .collect()
}

pub fn set_tab(state: &AppState, tab: &str) -> CommandResult<Vec<MovieRowDto>> {
    let tab: Tab = tab.parse().map_err(ErrorResponse::validation)?;
    state.view.lock().set_tab(tab);
    Ok(current_rows(state))
}

/// Pending notice from a failed list refresh, if any. Cleared once read.
pub fn take_sync_notice(state: &AppState) -> Option<String> {
    state.view.lock().take_sync_notice()
}
