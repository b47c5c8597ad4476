// src/application/commands/account_commands.rs
//
// Account Command Handlers

use crate::application::{dto::*, error_handling::*, state::AppState};
use crate::services::{DeletionOutcome, DeletionPrompter};

/// Run the deletion workflow for the signed-in user.
///
/// Without a signed-in user this is a no-op. Failures have already been
/// shown through the prompter, so they come back as an outcome, not an error.
pub async fn delete_account(
    state: &AppState,
    prompter: &dyn DeletionPrompter,
) -> CommandResult<DeletionResultDto> {
    let identity = match state.gateway.current_identity() {
        Some(identity) => identity,
        None => {
            log::warn!("Account deletion requested without a signed-in user");
            return Ok(DeletionResultDto {
                deleted: false,
                reauthenticated: false,
                outcome: "no_user".to_string(),
            });
        }
    };

    let mut workflow = state.deletion_workflow();
    let outcome = workflow.run(&identity, prompter).await;

    if let DeletionOutcome::Failed(e) = &outcome {
        log::error!(
            "Deletion of {} ended in {} after {:?}: {}",
            identity.uid,
            workflow.state(),
            workflow.transitions(),
            e
        );
    }

    state.sync_watchlist();
    Ok(DeletionResultDto::from(&outcome))
}
