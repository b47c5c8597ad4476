// src/application/error_handling.rs
//
// Error boundary for commands
//
// ARCHITECTURE:
// - Maps internal errors → user-facing notices
// - Auth errors are shown verbatim; everything else gets a generic message
// - Full error detail goes to the log, never to the notice

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub type CommandResult<T> = Result<T, ErrorResponse>;

/// Standard error response for the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Sign-in, sign-up, re-authentication
    Auth,

    /// Movie catalog lookups
    Catalog,

    /// Remote list storage
    Store,

    /// Invalid input rejected before any request
    Validation,

    /// Missing or invalid configuration
    Config,

    NotFound,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        let message = error.user_message();

        match error {
            AppError::Auth(_) | AppError::ReauthRequired => {
                Self::new(ErrorType::Auth, message, None)
            }

            AppError::Catalog { status } => {
                log::error!("Catalog request failed with status {}", status);
                Self::new(ErrorType::Catalog, message, Some(format!("status {}", status)))
            }

            AppError::Http(http_error) => {
                log::error!("HTTP error: {:?}", http_error);
                Self::new(ErrorType::Internal, message, None)
            }

            AppError::Store(detail) => {
                log::error!("Store error: {}", detail);
                Self::new(ErrorType::Store, message, Some(detail))
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, message, None)
            }

            AppError::Config(detail) => {
                log::error!("Configuration error: {}", detail);
                Self::new(ErrorType::Config, message, None)
            }

            AppError::Validation(_) => Self::new(ErrorType::Validation, message, None),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::Validation,
                message,
                Some(domain_error.to_string()),
            ),

            AppError::NotFound => Self::new(ErrorType::NotFound, message, None),
        }
    }

    /// Replace the message, keeping type and details (auth messages are kept)
    pub fn with_message(mut self, message: &str) -> Self {
        if self.error_type != ErrorType::Auth && self.error_type != ErrorType::Validation {
            self.message = message.to_string();
        }
        self
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> CommandResult<T>;

    /// Same, with a context-specific notice for non-auth failures
    fn or_notice(self, message: &str) -> CommandResult<T>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> CommandResult<T> {
        self.map_err(ErrorResponse::from_app_error)
    }

    fn or_notice(self, message: &str) -> CommandResult<T> {
        self.map_err(|e| ErrorResponse::from_app_error(e).with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::NotFound);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Resource not found");
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Invalid input");
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid input");
        assert!(!error.success);
    }

    #[test]
    fn test_auth_error_is_verbatim() {
        let error = ErrorResponse::from_app_error(AuthErrorKind::EmailInUse.into())
            .with_message("Something else");
        assert_eq!(error.error_type, ErrorType::Auth);
        assert_eq!(error.message, "An account with this email already exists");
    }

    #[test]
    fn test_catalog_error_gets_context_notice() {
        let result: Result<(), AppError> = Err(AppError::Catalog { status: 500 });
        let error = result.or_notice("Search failed").unwrap_err();
        assert_eq!(error.error_type, ErrorType::Catalog);
        assert_eq!(error.message, "Search failed");
        assert_eq!(error.details.as_deref(), Some("status 500"));
    }

    #[test]
    fn test_store_error_hides_details_from_message() {
        let error = ErrorResponse::from_app_error(AppError::Store("quota exceeded".to_string()));
        assert_eq!(error.error_type, ErrorType::Store);
        assert_eq!(error.message, "Could not update your lists");
    }

    #[test]
    fn test_serializes_snake_case_type() {
        let json = serde_json::to_value(ErrorResponse::validation("x")).unwrap();
        assert_eq!(json["error_type"], "validation");
    }
}
