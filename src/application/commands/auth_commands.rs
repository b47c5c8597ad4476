// src/application/commands/auth_commands.rs
//
// Authentication Command Handlers
//
// RULES:
// - Accept DTOs / plain values
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::{dto::*, error_handling::*, state::AppState};
use crate::services::SignUpRequest;

pub const PASSWORD_RESET_SENT: &str = "Password reset email sent";

/// Current session
pub fn get_session(state: &AppState) -> SessionDto {
    SessionDto::from(state.session.session())
}

fn signed_in(state: &AppState) -> SessionDto {
    state.sync_watchlist();
    get_session(state)
}

pub async fn sign_in(state: &AppState, email: &str, password: &str) -> CommandResult<SessionDto> {
    state
        .auth_service
        .sign_in(email, password)
        .await
        .to_error_response()?;

    Ok(signed_in(state))
}

pub async fn sign_up(state: &AppState, dto: SignUpDto) -> CommandResult<SessionDto> {
    state
        .auth_service
        .sign_up(SignUpRequest {
            email: dto.email,
            password: dto.password,
            confirm_password: dto.confirm_password,
        })
        .await
        .to_error_response()?;

    Ok(signed_in(state))
}

pub async fn sign_in_with_google(state: &AppState) -> CommandResult<SessionDto> {
    state
        .auth_service
        .sign_in_federated()
        .await
        .to_error_response()?;

    Ok(signed_in(state))
}

pub async fn sign_out(state: &AppState) -> CommandResult<SessionDto> {
    state
        .auth_service
        .sign_out()
        .await
        .or_notice("Sign out failed")?;

    Ok(signed_in(state))
}

/// Returns the notice to show on success
pub async fn reset_password(state: &AppState, email: &str) -> CommandResult<String> {
    state
        .auth_service
        .reset_password(email)
        .await
        .or_notice("Could not send the reset email")?;

    Ok(PASSWORD_RESET_SENT.to_string())
}
