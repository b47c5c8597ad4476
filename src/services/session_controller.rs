// src/services/session_controller.rs
//
// Session Controller - single source of truth for "who is signed in"
//
// RULES:
// - Starts as { identity: None, loading: true }
// - The first gateway notification clears `loading`, with or without an identity
// - Later notifications replace the identity only
// - After deactivation nothing changes anymore
// - No retries: delivery failures surface as identity = None

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::domain::Session;
use crate::events::Subscription;
use crate::integrations::IdentityGateway;

pub struct SessionController {
    state: Arc<watch::Sender<Session>>,
    active: Arc<AtomicBool>,
    listener: Mutex<Option<Subscription>>,
}

impl SessionController {
    /// Register with the gateway and start tracking identity changes.
    pub fn activate(gateway: &dyn IdentityGateway) -> Self {
        let (sender, _receiver) = watch::channel(Session::loading());
        let state = Arc::new(sender);
        let active = Arc::new(AtomicBool::new(true));

        let sink = Arc::clone(&state);
        let gate = Arc::clone(&active);
        let listener = gateway.on_identity_state_change(Box::new(move |identity| {
            if !gate.load(Ordering::SeqCst) {
                return;
            }
            log::debug!(
                "Identity state changed: {}",
                identity.as_ref().map(|i| i.uid.as_str()).unwrap_or("<none>")
            );
            sink.send_modify(|session| {
                session.identity = identity;
                session.loading = false;
            });
        }));

        Self {
            state,
            active,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Current value
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every later change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.state.borrow().user_id().map(str::to_string)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Unregister from the gateway. Idempotent.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(listener) = self.listener.lock().take() {
            listener.cancel();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, LinkedProvider};
    use crate::services::test_support::FakeIdentityGateway;

    fn ada() -> Identity {
        Identity::new("ada")
            .with_email("ada@example.com")
            .with_provider(LinkedProvider::Password)
    }

    #[test]
    fn test_starts_loading_without_identity() {
        let gateway = FakeIdentityGateway::new();
        let controller = SessionController::activate(&gateway);

        let session = controller.session();
        assert!(session.loading);
        assert!(session.identity.is_none());
        assert_eq!(gateway.listener_count(), 1);
    }

    #[test]
    fn test_first_notification_clears_loading_even_without_identity() {
        let gateway = FakeIdentityGateway::new();
        let controller = SessionController::activate(&gateway);

        gateway.emit(None);

        let session = controller.session();
        assert!(!session.loading);
        assert!(session.identity.is_none());
    }

    #[test]
    fn test_later_notifications_update_identity_in_order() {
        let gateway = FakeIdentityGateway::new();
        let controller = SessionController::activate(&gateway);

        gateway.emit(Some(ada()));
        assert_eq!(controller.current_user_id().as_deref(), Some("ada"));

        gateway.emit(None);
        assert_eq!(controller.current_user_id(), None);
        assert!(!controller.session().loading);
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let gateway = FakeIdentityGateway::new();
        let controller = SessionController::activate(&gateway);
        let mut receiver = controller.subscribe();

        gateway.emit(Some(ada()));

        receiver.changed().await.unwrap();
        assert!(receiver.borrow().is_signed_in());
    }

    #[test]
    fn test_no_changes_after_deactivation() {
        let gateway = FakeIdentityGateway::new();
        let controller = SessionController::activate(&gateway);

        controller.deactivate();
        controller.deactivate();
        gateway.emit(Some(ada()));

        assert!(controller.session().loading);
        assert!(!controller.is_active());
        assert_eq!(gateway.listener_count(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let gateway = FakeIdentityGateway::new();
        {
            let _controller = SessionController::activate(&gateway);
            assert_eq!(gateway.listener_count(), 1);
        }
        assert_eq!(gateway.listener_count(), 0);
    }
}
