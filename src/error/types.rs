// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Closed set of authentication failures.
///
/// Identity providers report these as free-form codes; adapters parse them
/// once into this enum so nothing downstream inspects message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthErrorKind {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailInUse,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    #[error("No account found for this email")]
    UserNotFound,

    #[error("This account has been disabled")]
    UserDisabled,

    #[error("Too many attempts, try again later")]
    TooManyAttempts,

    #[error("Federated sign-in is not available")]
    FederatedUnavailable,

    #[error("Federated sign-in was cancelled")]
    FederatedCancelled,

    #[error("Re-authentication used a different account")]
    UserMismatch,

    #[error("No user is signed in")]
    NoCurrentUser,

    #[error("Authentication failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(AuthErrorKind),

    /// The session is too old for a sensitive operation; the caller must
    /// re-authenticate before retrying.
    #[error("Recent sign-in required")]
    ReauthRequired,

    #[error("Catalog request failed with status {status}")]
    Catalog { status: u16 },

    #[error("Store error: {0}")]
    Store(String),

    /// Built through `From`, which strips the request URL (it carries API keys)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Resource not found")]
    NotFound,
}

impl From<AuthErrorKind> for AppError {
    fn from(kind: AuthErrorKind) -> Self {
        AppError::Auth(kind)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.without_url())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Store(format!("Timestamp parse error: {}", err))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl AppError {
    pub fn is_reauth_required(&self) -> bool {
        matches!(self, AppError::ReauthRequired)
    }

    /// Text that is safe to put in front of the user.
    ///
    /// Only auth, validation and config messages pass through; everything
    /// else collapses to a generic line and the detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(kind) => kind.to_string(),
            AppError::ReauthRequired => "Please sign in again to continue".to_string(),
            AppError::Catalog { .. } => "Catalog request failed".to_string(),
            AppError::Store(_) => "Could not update your lists".to_string(),
            AppError::Http(_) => "Network request failed".to_string(),
            AppError::Serialization(_) => "Data serialization failed".to_string(),
            AppError::Config(message) | AppError::Validation(message) => message.clone(),
            AppError::Domain(_) => "Invalid movie data".to_string(),
            AppError::NotFound => "Resource not found".to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
