//! Session data model shared by the store, the guard and the console.
//!
//! DESIGN
//! ======
//! The backend's user record is not interpreted here beyond its presence, so
//! `User` wraps the raw JSON value transparently and round-trips it untouched.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user record returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(pub serde_json::Value);

impl User {
    /// Look up a top-level string field, e.g. `email` or `name`, for display.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    /// Short label for logs and console output.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(email) = self.str_field("email") {
            return email.to_owned();
        }
        if let Some(name) = self.str_field("name") {
            return name.to_owned();
        }
        match self.0.get("id") {
            Some(id) => format!("user {id}"),
            None => "unknown user".to_owned(),
        }
    }
}

/// Email + password pair submitted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Both fields present after trimming. The backend does real validation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token and identity extracted from a successful login response.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
}

/// Result of `SessionStore::login`. Login never returns an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failure { message: String },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message } => Some(message),
        }
    }
}

/// Whether the startup verification has finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unresolved,
    Resolved,
}

/// Point-in-time view of the session, published to observers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub identity: Option<User>,
    pub token: Option<String>,
    pub status: SessionStatus,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status == SessionStatus::Resolved
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
