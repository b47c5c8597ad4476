// src/services/account_deletion_tests.rs
//
// ACCOUNT DELETION WORKFLOW TESTS
//
// SCENARIOS:
// - A: identity removal succeeds first time
// - B: ReauthRequired with a federated provider, reauth without a prompt
// - C: ReauthRequired, password only, prompt cancelled
// - D: ReauthRequired, no usable provider
// - Declined confirmation, failed bulk delete, second ReauthRequired

#[cfg(test)]
mod deletion_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::domain::{Identity, LinkedProvider, WatchStatus};
    use crate::error::{AppError, AuthErrorKind};
    use crate::events::{AccountDeleted, EventBus};
    use crate::repositories::MemoryDocumentStore;
    use crate::services::account_deletion::{
        AccountDeletionWorkflow, DeletionOutcome, DeletionPrompter,
        SIGN_IN_AGAIN_NOTICE,
    };
    use crate::services::session_controller::SessionController;
    use crate::services::test_support::FakeIdentityGateway;
    use crate::services::watchlist_service::{UpsertMovieRequest, WatchlistService};

    use crate::services::account_deletion::DeletionState::*;

    struct ScriptedPrompter {
        confirm: bool,
        password: Option<String>,
        password_prompts: Mutex<usize>,
        notices: Mutex<Vec<String>>,
    }

    impl ScriptedPrompter {
        fn confirming() -> Self {
            Self {
                confirm: true,
                password: None,
                password_prompts: Mutex::new(0),
                notices: Mutex::new(Vec::new()),
            }
        }

        fn with_password(mut self, password: &str) -> Self {
            self.password = Some(password.to_string());
            self
        }

        fn declining() -> Self {
            Self {
                confirm: false,
                ..Self::confirming()
            }
        }

        fn prompts(&self) -> usize {
            *self.password_prompts.lock()
        }

        fn notices(&self) -> Vec<String> {
            self.notices.lock().clone()
        }
    }

    #[async_trait]
    impl DeletionPrompter for ScriptedPrompter {
        async fn confirm_deletion(&self) -> bool {
            self.confirm
        }

        async fn prompt_password(&self) -> Option<String> {
            *self.password_prompts.lock() += 1;
            self.password.clone()
        }

        fn notify(&self, message: &str) {
            self.notices.lock().push(message.to_string());
        }
    }

    struct Fixture {
        gateway: Arc<FakeIdentityGateway>,
        store: Arc<MemoryDocumentStore>,
        bus: Arc<EventBus>,
        workflow: AccountDeletionWorkflow,
    }

    async fn fixture(identity: &Identity) -> Fixture {
        let bus = Arc::new(EventBus::new());
        let store = Arc::new(MemoryDocumentStore::new(Arc::clone(&bus)));
        let gateway = Arc::new(
            FakeIdentityGateway::signed_in(identity.clone()).with_observed_store(Arc::clone(&store)),
        );
        let watchlist = Arc::new(WatchlistService::new(store.clone(), Arc::clone(&bus)));

        for id in [11, 12] {
            watchlist
                .upsert(
                    &identity.uid,
                    UpsertMovieRequest {
                        id,
                        title: format!("Movie {}", id),
                        year: None,
                        poster_path: None,
                        status: WatchStatus::ToWatch,
                        created_at: None,
                    },
                )
                .await
                .unwrap();
        }

        let workflow =
            AccountDeletionWorkflow::new(gateway.clone(), watchlist, Arc::clone(&bus));

        Fixture {
            gateway,
            store,
            bus,
            workflow,
        }
    }

    fn password_user() -> Identity {
        Identity::new("pw-user")
            .with_email("pw@example.com")
            .with_provider(LinkedProvider::Password)
    }

    fn federated_user() -> Identity {
        Identity::new("google-user")
            .with_email("g@example.com")
            .with_provider(LinkedProvider::Google)
            .with_provider(LinkedProvider::Password)
    }

    #[tokio::test]
    async fn test_scenario_a_first_try_succeeds() {
        let user = password_user();
        let mut fx = fixture(&user).await;
        let session = SessionController::activate(fx.gateway.as_ref());
        fx.gateway.emit(Some(user.clone()));
        assert!(session.session().is_signed_in());

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Deleted {
                reauthenticated: false
            }
        ));
        assert_eq!(fx.workflow.state(), Success);
        assert_eq!(
            fx.workflow.transitions(),
            &[Idle, ConfirmPending, Deleting, Success]
        );
        assert!(session.session().identity.is_none());
        assert_eq!(prompter.prompts(), 0);
        assert_eq!(fx.store.document_count(), 0);
        assert_eq!(fx.bus.subscriber_count::<AccountDeleted>(), 0);
        assert!(fx
            .bus
            .get_event_log()
            .iter()
            .any(|entry| entry.event_type == "AccountDeleted"));
    }

    #[tokio::test]
    async fn test_movies_are_gone_before_identity_removal() {
        let user = password_user();
        let mut fx = fixture(&user).await;

        fx.workflow
            .run(&user, &ScriptedPrompter::confirming())
            .await;

        assert_eq!(fx.gateway.documents_at_delete(), vec![0]);
    }

    #[tokio::test]
    async fn test_scenario_b_federated_reauth_without_prompt() {
        let user = federated_user();
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Deleted {
                reauthenticated: true
            }
        ));
        assert_eq!(prompter.prompts(), 0);
        assert_eq!(
            fx.gateway.calls(),
            vec![
                "delete_current_identity",
                "reauthenticate_federated",
                "delete_current_identity"
            ]
        );
        assert_eq!(
            fx.workflow.transitions(),
            &[
                Idle,
                ConfirmPending,
                Deleting,
                ReauthRequired,
                ReauthPending,
                Retrying,
                Success
            ]
        );
    }

    #[tokio::test]
    async fn test_scenario_c_cancelled_password_prompt_returns_to_idle() {
        let user = password_user();
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::ReauthCancelled));
        assert_eq!(fx.workflow.state(), Idle);
        assert_eq!(prompter.prompts(), 1);
        assert!(prompter.notices().is_empty());
        assert!(fx.gateway.current_identity_is_set());
        assert_eq!(fx.gateway.calls(), vec!["delete_current_identity"]);
    }

    #[tokio::test]
    async fn test_password_reauth_then_retry() {
        let user = password_user();
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));

        let prompter = ScriptedPrompter::confirming().with_password("secret1");
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(outcome.is_deleted());
        assert_eq!(prompter.prompts(), 1);
        assert_eq!(
            fx.gateway.calls(),
            vec![
                "delete_current_identity",
                "reauthenticate_with_password",
                "delete_current_identity"
            ]
        );
    }

    #[tokio::test]
    async fn test_scenario_d_no_usable_provider() {
        let user = Identity::new("anon").with_provider(LinkedProvider::Other("github.com".into()));
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::ReauthUnavailable));
        assert_eq!(fx.workflow.state(), Idle);
        assert_eq!(prompter.notices(), vec![SIGN_IN_AGAIN_NOTICE.to_string()]);
        assert_eq!(prompter.prompts(), 0);
        assert_eq!(fx.gateway.calls(), vec!["delete_current_identity"]);
        assert!(fx.gateway.current_identity_is_set());
    }

    #[tokio::test]
    async fn test_declined_confirmation_has_no_side_effects() {
        let user = password_user();
        let mut fx = fixture(&user).await;

        let outcome = fx.workflow.run(&user, &ScriptedPrompter::declining()).await;

        assert!(matches!(outcome, DeletionOutcome::Declined));
        assert_eq!(fx.workflow.transitions(), &[Idle, ConfirmPending, Idle]);
        assert_eq!(fx.store.document_count(), 2);
        assert!(fx.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_other_identity_error_is_surfaced_without_retry() {
        let user = federated_user();
        let mut fx = fixture(&user).await;
        fx.gateway
            .script_delete(Err(AppError::Auth(AuthErrorKind::UserDisabled)));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Failed(AppError::Auth(AuthErrorKind::UserDisabled))
        ));
        assert_eq!(fx.workflow.state(), Failure);
        assert_eq!(
            prompter.notices(),
            vec!["Could not delete account: This account has been disabled".to_string()]
        );
        assert_eq!(fx.gateway.calls(), vec!["delete_current_identity"]);
    }

    #[tokio::test]
    async fn test_second_reauth_required_is_terminal() {
        let user = federated_user();
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));
        fx.gateway.script_delete(Err(AppError::ReauthRequired));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(
            outcome,
            DeletionOutcome::Failed(AppError::ReauthRequired)
        ));
        assert_eq!(fx.workflow.state(), Failure);
        assert_eq!(
            fx.gateway
                .calls()
                .iter()
                .filter(|call| **call == "delete_current_identity")
                .count(),
            2
        );
        assert_eq!(prompter.notices(), vec![SIGN_IN_AGAIN_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn test_network_failure_notice_has_no_request_detail() {
        let user = password_user();
        let mut fx = fixture(&user).await;
        let network_error = reqwest::Client::new()
            .post("http://127.0.0.1:1/v1/accounts:delete?key=SECRETKEY")
            .send()
            .await
            .unwrap_err();
        fx.gateway.script_delete(Err(AppError::from(network_error)));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::Failed(AppError::Http(_))));
        assert_eq!(
            prompter.notices(),
            vec!["Could not delete account: Network request failed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cancelled_federated_reauth_returns_to_idle() {
        let user = federated_user();
        let mut fx = fixture(&user).await;
        fx.gateway.script_delete(Err(AppError::ReauthRequired));
        fx.gateway
            .script_reauth(Err(AppError::Auth(AuthErrorKind::FederatedCancelled)));

        let prompter = ScriptedPrompter::confirming();
        let outcome = fx.workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::ReauthCancelled));
        assert_eq!(fx.workflow.state(), Idle);
        assert!(prompter.notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_bulk_delete_keeps_identity() {
        let user = password_user();
        let bus = Arc::new(EventBus::new());
        let gateway = Arc::new(FakeIdentityGateway::signed_in(user.clone()));

        let mut store = crate::repositories::MockDocumentStore::new();
        store
            .expect_list_children()
            .returning(|_| Err(AppError::Store("unavailable".to_string())));
        let watchlist = Arc::new(WatchlistService::new(Arc::new(store), Arc::clone(&bus)));

        let mut workflow = AccountDeletionWorkflow::new(gateway.clone(), watchlist, bus);
        let prompter = ScriptedPrompter::confirming();
        let outcome = workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::Failed(AppError::Store(_))));
        assert_eq!(workflow.transitions(), &[Idle, ConfirmPending, Deleting, Failure]);
        assert!(gateway.calls().is_empty());
        assert!(gateway.current_identity_is_set());
    }

    #[tokio::test]
    async fn test_store_asking_for_sign_in_fails_without_reauth() {
        let user = federated_user();
        let bus = Arc::new(EventBus::new());
        let gateway = Arc::new(FakeIdentityGateway::signed_in(user.clone()));

        let mut store = crate::repositories::MockDocumentStore::new();
        store
            .expect_list_children()
            .returning(|_| Err(AppError::ReauthRequired));
        let watchlist = Arc::new(WatchlistService::new(Arc::new(store), Arc::clone(&bus)));

        let mut workflow = AccountDeletionWorkflow::new(gateway.clone(), watchlist, bus);
        let prompter = ScriptedPrompter::confirming();
        let outcome = workflow.run(&user, &prompter).await;

        assert!(matches!(outcome, DeletionOutcome::Failed(AppError::Store(_))));
        assert_eq!(workflow.transitions(), &[Idle, ConfirmPending, Deleting, Failure]);
        assert!(gateway.calls().is_empty());
        assert_eq!(prompter.prompts(), 0);
        assert_eq!(
            prompter.notices(),
            vec!["Could not delete account: Could not update your lists".to_string()]
        );
    }
}
