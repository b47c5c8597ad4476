// src/integrations/local_identity.rs
//
// In-process identity provider for the memory backend.
//
// Accounts live only as long as the process. Sessions never go stale, so
// account removal never asks for re-authentication, and there is no
// federated provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::{Identity, LinkedProvider};
use crate::error::{AppError, AppResult, AuthErrorKind};
use crate::events::{EventBus, IdentityStateChanged, Subscription};
use crate::integrations::identity_gateway::{IdentityCallback, IdentityGateway};

const MIN_PASSWORD_LENGTH: usize = 6;

struct LocalAccount {
    identity: Identity,
    password: String,
}

pub struct LocalIdentityGateway {
    /// Keyed by lowercased email
    accounts: RwLock<HashMap<String, LocalAccount>>,
    current: RwLock<Option<Identity>>,
    event_bus: Arc<EventBus>,
    notify_order: Mutex<()>,
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl LocalIdentityGateway {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            current: RwLock::new(None),
            event_bus,
            notify_order: Mutex::new(()),
        }
    }

    fn publish(&self, identity: Option<Identity>) {
        let _order = self.notify_order.lock();
        *self.current.write() = identity.clone();
        self.event_bus.emit(IdentityStateChanged::new(identity));
    }

    fn check_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        let accounts = self.accounts.read();
        match accounts.get(&account_key(email)) {
            Some(account) if account.password == password => Ok(account.identity.clone()),
            _ => Err(AuthErrorKind::InvalidCredentials.into()),
        }
    }
}

#[async_trait]
impl IdentityGateway for LocalIdentityGateway {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        let identity = self.check_password(email, password)?;
        log::info!("Signed in locally as {}", identity.uid);
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthErrorKind::WeakPassword.into());
        }

        let identity = {
            let mut accounts = self.accounts.write();
            let key = account_key(email);
            if accounts.contains_key(&key) {
                return Err(AuthErrorKind::EmailInUse.into());
            }

            let identity = Identity::new(Uuid::new_v4().simple().to_string())
                .with_email(email.trim())
                .with_provider(LinkedProvider::Password);
            accounts.insert(
                key,
                LocalAccount {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            identity
        };

        log::info!("Created local account {}", identity.uid);
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> AppResult<Identity> {
        Err(AuthErrorKind::FederatedUnavailable.into())
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.publish(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        // Same answer whether or not the account exists
        log::info!(
            "Local password reset requested (account exists: {})",
            self.accounts.read().contains_key(&account_key(email))
        );
        Ok(())
    }

    async fn delete_current_identity(&self) -> AppResult<()> {
        let current = match self.current_identity() {
            Some(identity) => identity,
            None => return Ok(()),
        };

        self.accounts
            .write()
            .retain(|_, account| account.identity.uid != current.uid);

        log::info!("Deleted local account {}", current.uid);
        self.publish(None);
        Ok(())
    }

    async fn reauthenticate_with_password(&self, password: &str) -> AppResult<()> {
        let current = self
            .current_identity()
            .ok_or(AppError::Auth(AuthErrorKind::NoCurrentUser))?;
        let email = current
            .email
            .clone()
            .ok_or(AppError::Auth(AuthErrorKind::NoCurrentUser))?;

        self.check_password(&email, password).map(|_| ())
    }

    async fn reauthenticate_federated(&self) -> AppResult<()> {
        Err(AuthErrorKind::FederatedUnavailable.into())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.read().clone()
    }

    fn on_identity_state_change(&self, callback: IdentityCallback) -> Subscription {
        let callback: Arc<dyn Fn(Option<Identity>) + Send + Sync> = Arc::from(callback);
        let _order = self.notify_order.lock();

        let listener = Arc::clone(&callback);
        let subscription = self
            .event_bus
            .subscribe::<IdentityStateChanged, _>(move |event| listener(event.identity.clone()));

        callback(self.current_identity());

        subscription
    }
}
