// src/domain/identity.rs
//
// Identity and Session
//
// An Identity is owned by the identity provider; the client only ever holds
// a read-only copy. A Session binds "current identity or none" to the
// loading flag the view layer waits on.

use serde::{Deserialize, Serialize};

/// A sign-in method linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkedProvider {
    /// Email and password
    Password,
    /// Google federated sign-in
    Google,
    /// Any provider this client cannot re-authenticate with
    Other(String),
}

impl LinkedProvider {
    /// Parse a provider id as reported by the identity provider.
    pub fn from_provider_id(provider_id: &str) -> Self {
        match provider_id {
            "password" => LinkedProvider::Password,
            "google.com" => LinkedProvider::Google,
            other => LinkedProvider::Other(other.to_string()),
        }
    }

    pub fn provider_id(&self) -> &str {
        match self {
            LinkedProvider::Password => "password",
            LinkedProvider::Google => "google.com",
            LinkedProvider::Other(id) => id,
        }
    }

    pub fn is_federated(&self) -> bool {
        matches!(self, LinkedProvider::Google)
    }
}

impl std::fmt::Display for LinkedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.provider_id())
    }
}

/// An authenticated account as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Immutable account id
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Linked sign-in methods, in the order the provider reports them
    pub providers: Vec<LinkedProvider>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            providers: Vec::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_provider(mut self, provider: LinkedProvider) -> Self {
        if !self.providers.contains(&provider) {
            self.providers.push(provider);
        }
        self
    }

    pub fn has_federated_provider(&self) -> bool {
        self.providers.iter().any(LinkedProvider::is_federated)
    }

    pub fn has_password_provider(&self) -> bool {
        self.providers.contains(&LinkedProvider::Password)
    }

    /// Email if known, otherwise display name.
    pub fn label(&self) -> &str {
        self.email
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Current authentication state consumed by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl Session {
    /// State before the identity provider has reported anything.
    pub fn loading() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.uid.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}
