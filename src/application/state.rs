// src/application/state.rs

use std::sync::Arc;

use parking_lot::Mutex;

use crate::application::error_handling::ErrorResponse;
use crate::application::view_state::ViewState;
use crate::events::{EventBus, Subscription};
use crate::integrations::{CatalogApi, IdentityGateway};
use crate::repositories::DocumentStore;
use crate::services::{
    AccountDeletionWorkflow, AuthService, CatalogService, SessionController, WatchlistService,
};

pub const SYNC_FAILED_NOTICE: &str = "Could not refresh your lists";

/// Live watchlist subscription and the user it belongs to
struct ActiveWatch {
    user_id: String,
    _subscription: Subscription,
}

/// Application state shared by every command.
/// All services are Arc-wrapped; the binary builds one of these at startup.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub gateway: Arc<dyn IdentityGateway>,
    pub session: SessionController,
    pub auth_service: Arc<AuthService>,
    pub catalog_service: Arc<CatalogService>,
    pub watchlist_service: Arc<WatchlistService>,
    pub view: Arc<Mutex<ViewState>>,
    active_watch: Mutex<Option<ActiveWatch>>,
}

impl AppState {
    pub fn new(
        event_bus: Arc<EventBus>,
        gateway: Arc<dyn IdentityGateway>,
        store: Arc<dyn DocumentStore>,
        catalog_api: Arc<dyn CatalogApi>,
    ) -> Self {
        let session = SessionController::activate(gateway.as_ref());

        Self {
            auth_service: Arc::new(AuthService::new(Arc::clone(&gateway))),
            catalog_service: Arc::new(CatalogService::new(catalog_api)),
            watchlist_service: Arc::new(WatchlistService::new(store, Arc::clone(&event_bus))),
            view: Arc::new(Mutex::new(ViewState::new())),
            active_watch: Mutex::new(None),
            session,
            gateway,
            event_bus,
        }
    }

    /// Point the saved-movie projection at the signed-in user.
    ///
    /// Called whenever the session changes; the previous user's subscription
    /// is released before the next one opens.
    pub fn sync_watchlist(&self) {
        let user_id = self.session.current_user_id();
        let mut active = self.active_watch.lock();

        if active.as_ref().map(|w| w.user_id.as_str()) == user_id.as_deref() {
            return;
        }

        if let Some(previous) = active.take() {
            log::debug!("Releasing watchlist subscription of {}", previous.user_id);
        }
        self.view.lock().clear_saved();

        if let Some(user_id) = user_id {
            let view = Arc::clone(&self.view);
            let subscription = self.watchlist_service.subscribe(
                &user_id,
                Box::new(move |snapshot| match snapshot {
                    Ok(movies) => view.lock().set_saved(movies),
                    Err(e) => {
                        let notice =
                            ErrorResponse::from_app_error(e).with_message(SYNC_FAILED_NOTICE);
                        view.lock().set_sync_notice(notice.message);
                    }
                }),
            );
            log::debug!("Watching the lists of {}", user_id);
            *active = Some(ActiveWatch {
                user_id,
                _subscription: subscription,
            });
        }
    }

    pub fn watched_user(&self) -> Option<String> {
        self.active_watch.lock().as_ref().map(|w| w.user_id.clone())
    }

    pub fn deletion_workflow(&self) -> AccountDeletionWorkflow {
        AccountDeletionWorkflow::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.watchlist_service),
            Arc::clone(&self.event_bus),
        )
    }
}
