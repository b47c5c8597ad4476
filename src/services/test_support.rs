// src/services/test_support.rs
//
// Scriptable identity gateway for service tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Identity;
use crate::error::{AppError, AppResult, AuthErrorKind};
use crate::events::{EventBus, IdentityStateChanged, Subscription};
use crate::integrations::{IdentityCallback, IdentityGateway};
use crate::repositories::MemoryDocumentStore;

/// Records calls, replays scripted results, and notifies listeners the way
/// a real provider does (except that new listeners are not called back
/// immediately, so the loading state stays observable).
pub struct FakeIdentityGateway {
    identity: Mutex<Option<Identity>>,
    bus: EventBus,
    calls: Mutex<Vec<&'static str>>,
    delete_results: Mutex<VecDeque<AppResult<()>>>,
    reauth_results: Mutex<VecDeque<AppResult<()>>>,
    observed_store: Option<Arc<MemoryDocumentStore>>,
    documents_at_delete: Mutex<Vec<usize>>,
}

impl FakeIdentityGateway {
    pub fn new() -> Self {
        Self {
            identity: Mutex::new(None),
            bus: EventBus::new(),
            calls: Mutex::new(Vec::new()),
            delete_results: Mutex::new(VecDeque::new()),
            reauth_results: Mutex::new(VecDeque::new()),
            observed_store: None,
            documents_at_delete: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let gateway = Self::new();
        *gateway.identity.lock() = Some(identity);
        gateway
    }

    /// Record the store's document count whenever identity removal is attempted
    pub fn with_observed_store(mut self, store: Arc<MemoryDocumentStore>) -> Self {
        self.observed_store = Some(store);
        self
    }

    pub fn script_delete(&self, result: AppResult<()>) {
        self.delete_results.lock().push_back(result);
    }

    pub fn script_reauth(&self, result: AppResult<()>) {
        self.reauth_results.lock().push_back(result);
    }

    pub fn emit(&self, identity: Option<Identity>) {
        *self.identity.lock() = identity.clone();
        self.bus.emit(IdentityStateChanged::new(identity));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn documents_at_delete(&self) -> Vec<usize> {
        self.documents_at_delete.lock().clone()
    }

    pub fn current_identity_is_set(&self) -> bool {
        self.identity.lock().is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.bus.subscriber_count::<IdentityStateChanged>()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    fn next_reauth(&self) -> AppResult<()> {
        self.reauth_results.lock().pop_front().unwrap_or(Ok(()))
    }
}

impl Default for FakeIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    async fn sign_in_with_password(&self, email: &str, _password: &str) -> AppResult<Identity> {
        self.record("sign_in_with_password");
        let identity = Identity::new(format!("uid-{}", email)).with_email(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        self.record("sign_up_with_password");
        if password.len() < 6 {
            return Err(AppError::Auth(AuthErrorKind::WeakPassword));
        }
        let identity = Identity::new(format!("uid-{}", email)).with_email(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> AppResult<Identity> {
        self.record("sign_in_federated");
        Err(AppError::Auth(AuthErrorKind::FederatedUnavailable))
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.record("sign_out");
        self.emit(None);
        Ok(())
    }

    async fn send_password_reset(&self, _email: &str) -> AppResult<()> {
        self.record("send_password_reset");
        Ok(())
    }

    async fn delete_current_identity(&self) -> AppResult<()> {
        self.record("delete_current_identity");
        if let Some(store) = &self.observed_store {
            self.documents_at_delete.lock().push(store.document_count());
        }

        let result = self.delete_results.lock().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.emit(None);
        }
        result
    }

    async fn reauthenticate_with_password(&self, _password: &str) -> AppResult<()> {
        self.record("reauthenticate_with_password");
        self.next_reauth()
    }

    async fn reauthenticate_federated(&self) -> AppResult<()> {
        self.record("reauthenticate_federated");
        self.next_reauth()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().clone()
    }

    fn on_identity_state_change(&self, callback: IdentityCallback) -> Subscription {
        self.bus
            .subscribe::<IdentityStateChanged, _>(move |event| callback(event.identity.clone()))
    }
}
