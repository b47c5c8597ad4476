// src/services/account_deletion.rs
//
// Account Deletion Workflow
//
// STATES:
//   Idle -> ConfirmPending -> Deleting -> Success
//                                      -> Failure
//                                      -> ReauthRequired -> ReauthPending -> Retrying -> Success | Failure
//
// RULES:
// - The user's movies are deleted before the identity; if that fails the
//   identity is left alone
// - Only ReauthRequired from identity removal leads to re-authentication, and
//   the retry happens once; store failures always end in Failure
// - Notices carry user-safe text only, never raw error detail
// - A cancelled re-authentication returns to Idle without a notice

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Identity;
use crate::error::{AppError, AppResult, AuthErrorKind};
use crate::events::{AccountDeleted, EventBus};
use crate::integrations::IdentityGateway;
use crate::services::watchlist_service::WatchlistService;

pub const SIGN_IN_AGAIN_NOTICE: &str =
    "Please sign out and sign back in, then try deleting your account again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Idle,
    ConfirmPending,
    Deleting,
    ReauthRequired,
    ReauthPending,
    Retrying,
    Success,
    Failure,
}

impl fmt::Display for DeletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug)]
pub enum DeletionOutcome {
    Deleted { reauthenticated: bool },
    /// The user declined the confirmation
    Declined,
    /// The user backed out of re-authentication
    ReauthCancelled,
    /// No linked provider can re-authenticate from here
    ReauthUnavailable,
    Failed(AppError),
}

impl DeletionOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeletionOutcome::Deleted { .. })
    }
}

/// The UI side of the workflow.
#[async_trait]
pub trait DeletionPrompter: Send + Sync {
    /// Blocking yes/no confirmation
    async fn confirm_deletion(&self) -> bool;

    /// `None` (or an empty answer) means the user cancelled
    async fn prompt_password(&self) -> Option<String>;

    fn notify(&self, message: &str);
}

pub struct AccountDeletionWorkflow {
    gateway: Arc<dyn IdentityGateway>,
    watchlist: Arc<WatchlistService>,
    event_bus: Arc<EventBus>,
    state: DeletionState,
    transitions: Vec<DeletionState>,
}

impl AccountDeletionWorkflow {
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        watchlist: Arc<WatchlistService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            gateway,
            watchlist,
            event_bus,
            state: DeletionState::Idle,
            transitions: vec![DeletionState::Idle],
        }
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    /// Every state visited by the last run, starting with Idle
    pub fn transitions(&self) -> &[DeletionState] {
        &self.transitions
    }

    fn transition(&mut self, next: DeletionState) {
        log::info!("Account deletion: {} -> {}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    fn fail(&mut self, error: AppError, prompter: &dyn DeletionPrompter) -> DeletionOutcome {
        log::error!("Account deletion failed in {}: {:?}", self.state, error);

        let notice = match (&error, self.state) {
            (AppError::ReauthRequired, DeletionState::Retrying) => {
                SIGN_IN_AGAIN_NOTICE.to_string()
            }
            _ => format!("Could not delete account: {}", error.user_message()),
        };

        self.transition(DeletionState::Failure);
        prompter.notify(&notice);
        DeletionOutcome::Failed(error)
    }

    /// Movies first, identity second.
    ///
    /// Only the identity call may report ReauthRequired; a store that wants a
    /// fresh sign-in is a plain store failure here.
    async fn delete_everything(&self, user_id: &str) -> AppResult<()> {
        let removed = match self.watchlist.delete_all(user_id).await {
            Ok(removed) => removed,
            Err(AppError::ReauthRequired) => {
                return Err(AppError::Store(format!(
                    "Deleting the movies of {} was rejected: sign-in expired",
                    user_id
                )))
            }
            Err(e) => return Err(e),
        };
        log::debug!("Removed {} movies before deleting {}", removed, user_id);
        self.gateway.delete_current_identity().await
    }

    async fn reauthenticate(
        &mut self,
        identity: &Identity,
        prompter: &dyn DeletionPrompter,
    ) -> Result<(), DeletionOutcome> {
        if identity.has_federated_provider() {
            self.transition(DeletionState::ReauthPending);
            let result = self.gateway.reauthenticate_federated().await;
            return match result {
                Ok(()) => Ok(()),
                Err(AppError::Auth(AuthErrorKind::FederatedCancelled)) => {
                    self.transition(DeletionState::Idle);
                    Err(DeletionOutcome::ReauthCancelled)
                }
                Err(e) => Err(self.fail(e, prompter)),
            };
        }

        if identity.has_password_provider() {
            self.transition(DeletionState::ReauthPending);
            let password = match prompter.prompt_password().await {
                Some(password) if !password.is_empty() => password,
                _ => {
                    self.transition(DeletionState::Idle);
                    return Err(DeletionOutcome::ReauthCancelled);
                }
            };

            let result = self.gateway.reauthenticate_with_password(&password).await;
            return match result {
                Ok(()) => Ok(()),
                Err(e) => Err(self.fail(e, prompter)),
            };
        }

        log::warn!(
            "No re-authentication method for {} (providers: {:?})",
            identity.uid,
            identity.providers
        );
        prompter.notify(SIGN_IN_AGAIN_NOTICE);
        self.transition(DeletionState::Idle);
        Err(DeletionOutcome::ReauthUnavailable)
    }

    fn succeed(&mut self, user_id: &str, reauthenticated: bool) -> DeletionOutcome {
        self.transition(DeletionState::Success);
        self.event_bus
            .emit(AccountDeleted::new(user_id.to_string(), reauthenticated));
        DeletionOutcome::Deleted { reauthenticated }
    }

    pub async fn run(
        &mut self,
        identity: &Identity,
        prompter: &dyn DeletionPrompter,
    ) -> DeletionOutcome {
        self.state = DeletionState::Idle;
        self.transitions = vec![DeletionState::Idle];

        self.transition(DeletionState::ConfirmPending);
        if !prompter.confirm_deletion().await {
            self.transition(DeletionState::Idle);
            return DeletionOutcome::Declined;
        }

        self.transition(DeletionState::Deleting);
        let first_attempt = self.delete_everything(&identity.uid).await;
        match first_attempt {
            Ok(()) => return self.succeed(&identity.uid, false),
            Err(AppError::ReauthRequired) => {}
            Err(e) => return self.fail(e, prompter),
        }

        self.transition(DeletionState::ReauthRequired);
        if let Err(outcome) = self.reauthenticate(identity, prompter).await {
            return outcome;
        }

        self.transition(DeletionState::Retrying);
        let retry = self.delete_everything(&identity.uid).await;
        match retry {
            Ok(()) => self.succeed(&identity.uid, true),
            Err(e) => self.fail(e, prompter),
        }
    }
}
