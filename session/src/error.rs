//! Error types for the session core.
//!
//! ERROR HANDLING
//! ==============
//! Backend and storage failures are typed here, but they stop at the
//! `SessionStore` boundary: login turns them into a `LoginOutcome` and
//! verification turns them into a cleared, resolved session. Only the content
//! client surfaces `ContentError` to its callers.

/// Failures talking to the authentication backend.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("auth request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("auth request rejected: status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// The backend answered 2xx but the body lacked an expected field.
    #[error("malformed auth response: missing `{0}`")]
    Malformed(&'static str),

    /// Verification did not finish within the configured deadline.
    #[error("auth request timed out after {0}s")]
    Timeout(u64),
}

impl AuthError {
    /// Backend-supplied human readable message, when one was returned.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Failures reading or writing the persisted token.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures from the content (articles/authors/categories) API.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content request rejected: status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("content response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend rejected the bearer token; the session has been cleared.
    #[error("session expired or not signed in")]
    Unauthorized,
}
