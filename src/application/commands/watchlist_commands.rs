// src/application/commands/watchlist_commands.rs
//
// Watchlist Command Handlers
//
// RULES:
// - Only for the signed-in user
// - Movies are looked up among the visible rows
// - Store failures become a notice; the live projection is not touched

use crate::application::{dto::*, error_handling::*, state::AppState};
use crate::domain::WatchStatus;
use crate::error::{AppError, AuthErrorKind};
use crate::services::UpsertMovieRequest;

fn require_user(state: &AppState) -> CommandResult<String> {
    state
        .session
        .current_user_id()
        .ok_or_else(|| ErrorResponse::from_app_error(AppError::Auth(AuthErrorKind::NoCurrentUser)))
}

/// Put a visible movie on a list (or move it to the other one)
pub async fn save_movie(state: &AppState, movie_id: u64, status: WatchStatus) -> CommandResult<()> {
    let user_id = require_user(state)?;

    let request = {
        let view = state.view.lock();
        match view.find_saved(movie_id) {
            Some(saved) => UpsertMovieRequest::from_saved(saved, status),
            None => match view.find_entry(movie_id) {
                Some(entry) => UpsertMovieRequest::from_entry(&entry, status),
                None => return Err(ErrorResponse::not_found("Movie")),
            },
        }
    };

    state
        .watchlist_service
        .upsert(&user_id, request)
        .await
        .or_notice("Could not save movie")
}

pub async fn remove_movie(state: &AppState, movie_id: u64) -> CommandResult<()> {
    let user_id = require_user(state)?;

    state
        .watchlist_service
        .remove(&user_id, movie_id)
        .await
        .or_notice("Could not remove movie")
}

/// Saved movies on one list, newest first
pub fn list_saved(state: &AppState, status: WatchStatus) -> CommandResult<Vec<SavedMovieDto>> {
    require_user(state)?;

    Ok(state
        .view
        .lock()
        .saved_by_status(status)
        .into_iter()
        .map(SavedMovieDto::from)
        .collect())
}
