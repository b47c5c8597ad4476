// src/integrations/identity_gateway.rs
//
// Identity Gateway contract
//
// The identity provider owns accounts and sessions. Implementations report
// every sign-in, sign-out and account removal to registered listeners, in
// the order they happen.

use async_trait::async_trait;

use crate::domain::Identity;
use crate::error::AppResult;
use crate::events::Subscription;

/// Receives the new identity (or `None` when signed out)
pub type IdentityCallback = Box<dyn Fn(Option<Identity>) + Send + Sync>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Identity>;

    async fn sign_up_with_password(&self, email: &str, password: &str) -> AppResult<Identity>;

    async fn sign_in_federated(&self) -> AppResult<Identity>;

    async fn sign_out(&self) -> AppResult<()>;

    async fn send_password_reset(&self, email: &str) -> AppResult<()>;

    /// Remove the signed-in account.
    ///
    /// Fails with `AppError::ReauthRequired` when the sign-in is too old.
    async fn delete_current_identity(&self) -> AppResult<()>;

    async fn reauthenticate_with_password(&self, password: &str) -> AppResult<()>;

    async fn reauthenticate_federated(&self) -> AppResult<()>;

    fn current_identity(&self) -> Option<Identity>;

    /// Register a listener. Released when the handle is cancelled or dropped.
    fn on_identity_state_change(&self, callback: IdentityCallback) -> Subscription;
}

/// Supplies Google ID tokens for federated sign-in (a browser popup, a
/// device-code flow, a pasted token...).
#[async_trait]
pub trait FederatedCredentialSource: Send + Sync {
    /// `Ok(None)` means the user backed out.
    async fn obtain_google_id_token(&self) -> AppResult<Option<String>>;
}

/// Bearer tokens for calls made on behalf of the signed-in user
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> AppResult<String>;
}
