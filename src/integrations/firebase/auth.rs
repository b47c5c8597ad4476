// src/integrations/firebase/auth.rs
//
// Firebase Identity Toolkit Integration
//
// ARCHITECTURE:
// - REST client for accounts:* endpoints plus the secure-token refresh
// - Holds the only copy of the session tokens
// - Publishes IdentityStateChanged on sign-in, sign-out and deletion
// - Parses provider error codes into AuthErrorKind / ReauthRequired once,
//   here, so nothing downstream looks at message text
//
// Sessions live in memory only; every process starts signed out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Identity, LinkedProvider};
use crate::error::{AppError, AppResult, AuthErrorKind};
use crate::events::{EventBus, IdentityStateChanged, Subscription};
use crate::integrations::identity_gateway::{
    AccessTokenSource, FederatedCredentialSource, IdentityCallback, IdentityGateway,
};

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

/// ID tokens live for an hour; refresh a little before that
const TOKEN_REFRESH_AFTER: Duration = Duration::from_secs(55 * 60);
const REQUEST_TIMEOUT_SECS: u64 = 30;
const FEDERATED_REQUEST_URI: &str = "http://localhost";

/// Base addresses of the two Firebase auth services
#[derive(Debug, Clone)]
pub struct FirebaseEndpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
}

impl Default for FirebaseEndpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: IDENTITY_TOOLKIT_URL.to_string(),
            secure_token: SECURE_TOKEN_URL.to_string(),
        }
    }
}

impl FirebaseEndpoints {
    /// Both services behind one address (emulators, test servers)
    pub fn single(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            identity_toolkit: format!("{}/identitytoolkit", base),
            secure_token: format!("{}/securetoken", base),
        }
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    provider_user_info: Vec<ProviderUserInfo>,
    #[serde(default)]
    password_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUserInfo {
    provider_id: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Clone)]
struct AuthSession {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    issued_at: Instant,
}

/// Identity Gateway backed by Firebase Authentication
pub struct FirebaseIdentityGateway {
    api_key: String,
    endpoints: FirebaseEndpoints,
    http_client: Client,
    session: RwLock<Option<AuthSession>>,
    federated: Option<Arc<dyn FederatedCredentialSource>>,
    event_bus: Arc<EventBus>,
    /// Serializes emissions against listener registration
    notify_order: Mutex<()>,
}

impl FirebaseIdentityGateway {
    pub fn new(api_key: String, event_bus: Arc<EventBus>) -> AppResult<Self> {
        Self::with_endpoints(api_key, FirebaseEndpoints::default(), event_bus)
    }

    pub fn with_endpoints(
        api_key: String,
        endpoints: FirebaseEndpoints,
        event_bus: Arc<EventBus>,
    ) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("Firebase API key cannot be empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key,
            endpoints,
            http_client,
            session: RwLock::new(None),
            federated: None,
            event_bus,
            notify_order: Mutex::new(()),
        })
    }

    /// Enable federated sign-in through the given token source
    pub fn with_federated_source(mut self, source: Arc<dyn FederatedCredentialSource>) -> Self {
        self.federated = Some(source);
        self
    }

    // ========================================================================
    // INTERNAL: Requests
    // ========================================================================

    async fn call<B, R>(&self, method: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.endpoints.identity_toolkit, method);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));
            log::warn!("Identity Toolkit accounts:{} failed: {}", method, code);
            return Err(map_error_code(&code));
        }

        Ok(response.json().await?)
    }

    async fn lookup(&self, id_token: &str) -> AppResult<Identity> {
        let response: LookupResponse = self.call("lookup", &json!({ "idToken": id_token })).await?;

        let user = response
            .users
            .into_iter()
            .next()
            .ok_or(AppError::Auth(AuthErrorKind::UserNotFound))?;

        let mut identity = Identity::new(user.local_id);
        identity.email = user.email;
        identity.display_name = user.display_name;
        for info in &user.provider_user_info {
            identity = identity.with_provider(LinkedProvider::from_provider_id(&info.provider_id));
        }
        if user.password_hash.is_some() {
            identity = identity.with_provider(LinkedProvider::Password);
        }

        Ok(identity)
    }

    /// Turn a sign-in response into the current session and notify listeners.
    async fn establish(&self, response: SignInResponse) -> AppResult<Identity> {
        let identity = self.lookup(&response.id_token).await?;

        *self.session.write() = Some(AuthSession {
            identity: identity.clone(),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            issued_at: Instant::now(),
        });

        log::info!("Signed in as {}", identity.uid);
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    /// Swap tokens after re-authentication; the account must not change.
    fn replace_tokens(&self, response: SignInResponse) -> AppResult<()> {
        let mut session = self.session.write();
        let current = session
            .as_mut()
            .ok_or(AppError::Auth(AuthErrorKind::NoCurrentUser))?;

        if current.identity.uid != response.local_id {
            return Err(AppError::Auth(AuthErrorKind::UserMismatch));
        }

        current.id_token = response.id_token;
        current.refresh_token = response.refresh_token;
        current.issued_at = Instant::now();
        Ok(())
    }

    fn clear_session(&self) -> bool {
        self.session.write().take().is_some()
    }

    fn publish(&self, identity: Option<Identity>) {
        let _order = self.notify_order.lock();
        self.event_bus.emit(IdentityStateChanged::new(identity));
    }

    async fn google_id_token(&self, unavailable: AuthErrorKind) -> AppResult<String> {
        let source = self.federated.as_ref().ok_or(AppError::Auth(unavailable))?;
        source
            .obtain_google_id_token()
            .await?
            .ok_or(AppError::Auth(AuthErrorKind::FederatedCancelled))
    }

    async fn sign_in_with_idp(&self, google_id_token: &str) -> AppResult<SignInResponse> {
        self.call(
            "signInWithIdp",
            &json!({
                "postBody": format!("id_token={}&providerId=google.com", google_id_token),
                "requestUri": FEDERATED_REQUEST_URI,
                "returnSecureToken": true,
                "returnIdpCredential": true,
            }),
        )
        .await
    }

    /// Current ID token, refreshed when close to expiry
    async fn fresh_id_token(&self) -> AppResult<String> {
        let session = self
            .session
            .read()
            .clone()
            .ok_or(AppError::Auth(AuthErrorKind::NoCurrentUser))?;

        if session.issued_at.elapsed() < TOKEN_REFRESH_AFTER {
            return Ok(session.id_token);
        }

        log::debug!("Refreshing ID token for {}", session.identity.uid);
        let url = format!("{}/token", self.endpoints.secure_token);
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP_{}", status.as_u16()));
            return Err(map_error_code(&code));
        }

        let refreshed: RefreshResponse = response.json().await?;

        let mut guard = self.session.write();
        if let Some(current) = guard.as_mut() {
            current.id_token = refreshed.id_token.clone();
            current.refresh_token = refreshed.refresh_token;
            current.issued_at = Instant::now();
        }

        Ok(refreshed.id_token)
    }
}

/// Map an Identity Toolkit error message to the closed error taxonomy.
///
/// Messages look like `WEAK_PASSWORD : Password should be at least 6 characters`.
pub fn map_error_code(message: &str) -> AppError {
    let code = message
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match code {
        "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" | "USER_TOKEN_EXPIRED"
        | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" => AppError::ReauthRequired,
        "EMAIL_EXISTS" => AppError::Auth(AuthErrorKind::EmailInUse),
        "WEAK_PASSWORD" => AppError::Auth(AuthErrorKind::WeakPassword),
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" | "MISSING_PASSWORD" => {
            AppError::Auth(AuthErrorKind::InvalidCredentials)
        }
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => AppError::Auth(AuthErrorKind::UserNotFound),
        "USER_DISABLED" => AppError::Auth(AuthErrorKind::UserDisabled),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AppError::Auth(AuthErrorKind::TooManyAttempts),
        other => AppError::Auth(AuthErrorKind::Other(other.to_string())),
    }
}

#[async_trait]
impl IdentityGateway for FirebaseIdentityGateway {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        let response: SignInResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        self.establish(response).await
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        let response: SignInResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        self.establish(response).await
    }

    async fn sign_in_federated(&self) -> AppResult<Identity> {
        let token = self
            .google_id_token(AuthErrorKind::FederatedUnavailable)
            .await?;
        let response = self.sign_in_with_idp(&token).await?;
        self.establish(response).await
    }

    async fn sign_out(&self) -> AppResult<()> {
        if self.clear_session() {
            log::info!("Signed out");
            self.publish(None);
        }
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        Ok(())
    }

    async fn delete_current_identity(&self) -> AppResult<()> {
        if self.session.read().is_none() {
            log::warn!("Account deletion requested with nobody signed in");
            return Ok(());
        }

        let id_token = self.fresh_id_token().await?;
        let _: serde_json::Value = self.call("delete", &json!({ "idToken": id_token })).await?;

        self.clear_session();
        log::info!("Account deleted");
        self.publish(None);
        Ok(())
    }

    async fn reauthenticate_with_password(&self, password: &str) -> AppResult<()> {
        let email = self
            .session
            .read()
            .as_ref()
            .and_then(|s| s.identity.email.clone())
            .ok_or(AppError::Auth(AuthErrorKind::NoCurrentUser))?;

        let response: SignInResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email: &email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        self.replace_tokens(response)
    }

    async fn reauthenticate_federated(&self) -> AppResult<()> {
        if self.session.read().is_none() {
            return Err(AppError::Auth(AuthErrorKind::NoCurrentUser));
        }

        let token = self
            .google_id_token(AuthErrorKind::FederatedUnavailable)
            .await?;
        let response = self.sign_in_with_idp(&token).await?;
        self.replace_tokens(response)
    }

    fn current_identity(&self) -> Option<Identity> {
        self.session.read().as_ref().map(|s| s.identity.clone())
    }

    fn on_identity_state_change(&self, callback: IdentityCallback) -> Subscription {
        let callback: Arc<dyn Fn(Option<Identity>) + Send + Sync> = Arc::from(callback);
        let _order = self.notify_order.lock();

        let listener = Arc::clone(&callback);
        let subscription = self
            .event_bus
            .subscribe::<IdentityStateChanged, _>(move |event| listener(event.identity.clone()));

        // New listeners learn the current state right away
        callback(self.current_identity());

        subscription
    }
}

#[async_trait]
impl AccessTokenSource for FirebaseIdentityGateway {
    async fn access_token(&self) -> AppResult<String> {
        self.fresh_id_token().await
    }
}
