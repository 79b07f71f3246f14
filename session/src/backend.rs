//! Authentication backend calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthBackend` is the seam between the session store and the remote REST
//! API. `HttpAuthBackend` is the real implementation over `reqwest`; tests
//! substitute in-memory fakes.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors, non-2xx statuses and bodies missing `user`/`token` are
//! all reported as `AuthError`; the store decides how each one degrades.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::types::{Credentials, LoginGrant, User};

pub const VERIFY_PATH: &str = "/api/auth/test-auth";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Remote authentication operations consumed by the session store.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Confirm `token` is still valid and return its identity.
    async fn verify(&self, token: &str) -> Result<User, AuthError>;

    /// Exchange credentials for a bearer token and identity.
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError>;

    /// Tell the backend the user signed out. Callers treat this as best effort.
    async fn logout(&self) -> Result<(), AuthError>;
}

// =============================================================================
// HTTP
// =============================================================================

/// `AuthBackend` speaking JSON over HTTP to the CMS backend.
#[derive(Clone)]
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    /// Build an HTTP backend from session config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &SessionConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()
            .map_err(|e| AuthError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: config.backend_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn verify(&self, token: &str) -> Result<User, AuthError> {
        let resp = self
            .http
            .get(self.url(VERIFY_PATH))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejected(status.as_u16(), &body));
        }
        let body: Value = resp.json().await.map_err(|_| AuthError::Malformed("user"))?;
        parse_verify_body(body)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let resp = self.http.post(self.url(LOGIN_PATH)).json(credentials).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejected(status.as_u16(), &body));
        }
        let body: Value = resp.json().await.map_err(|_| AuthError::Malformed("data"))?;
        parse_login_body(body)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let resp = self.http.post(self.url(LOGOUT_PATH)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Rejected { status: status.as_u16(), message: None });
        }
        Ok(())
    }
}

// =============================================================================
// BODY PARSING
// =============================================================================

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Extract `user` from a verify response (`{ user }`).
pub(crate) fn parse_verify_body(body: Value) -> Result<User, AuthError> {
    match body {
        Value::Object(mut map) => match map.remove("user") {
            Some(user) if !user.is_null() => Ok(User(user)),
            _ => Err(AuthError::Malformed("user")),
        },
        _ => Err(AuthError::Malformed("user")),
    }
}

/// Extract `data.token` and `data.user` from a login response.
pub(crate) fn parse_login_body(body: Value) -> Result<LoginGrant, AuthError> {
    let Value::Object(mut map) = body else {
        return Err(AuthError::Malformed("data"));
    };
    let Some(Value::Object(mut data)) = map.remove("data") else {
        return Err(AuthError::Malformed("data"));
    };
    let token = match data.remove("token") {
        Some(Value::String(token)) if !token.trim().is_empty() => token,
        _ => return Err(AuthError::Malformed("data.token")),
    };
    let user = match data.remove("user") {
        Some(user) if !user.is_null() => User(user),
        _ => return Err(AuthError::Malformed("data.user")),
    };
    Ok(LoginGrant { token, user })
}

/// Build a rejection carrying the backend's `message` field when it sent one.
pub(crate) fn rejected(status: u16, body: &str) -> AuthError {
    AuthError::Rejected { status, message: backend_message(body) }
}

/// Pull a human readable `message` (or `error`) string out of an error body.
pub(crate) fn backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_owned)
}
