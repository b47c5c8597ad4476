// src/services/auth_service.rs
//
// Sign-in / sign-up / reset front door.
//
// Local checks (empty email, mismatched or short passwords) are rejected
// here without contacting the identity gateway.

use std::sync::Arc;

use crate::domain::Identity;
use crate::error::{AppError, AppResult, AuthErrorKind};
use crate::integrations::IdentityGateway;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct AuthService {
    gateway: Arc<dyn IdentityGateway>,
}

fn required_email(email: &str) -> AppResult<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Enter your email first".to_string()));
    }
    Ok(email)
}

impl AuthService {
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let email = required_email(email)?;
        if password.is_empty() {
            return Err(AppError::Validation("Enter your password".to_string()));
        }

        let identity = self.gateway.sign_in_with_password(email, password).await?;
        log::info!("Signed in {}", identity.uid);
        Ok(identity)
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> AppResult<Identity> {
        let email = required_email(&request.email)?;

        if request.password != request.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthErrorKind::WeakPassword.into());
        }

        let identity = self
            .gateway
            .sign_up_with_password(email, &request.password)
            .await?;
        log::info!("Created account {}", identity.uid);
        Ok(identity)
    }

    pub async fn sign_in_federated(&self) -> AppResult<Identity> {
        let identity = self.gateway.sign_in_federated().await?;
        log::info!("Signed in {} with a federated provider", identity.uid);
        Ok(identity)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.gateway.sign_out().await
    }

    pub async fn reset_password(&self, email: &str) -> AppResult<()> {
        let email = required_email(email)?;
        self.gateway.send_password_reset(email).await?;
        log::info!("Password reset requested");
        Ok(())
    }
}
