//! Session store: single source of truth for authentication state.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is a cheaply cloneable handle that hosts pass explicitly to
//! whatever needs the session (route guards, the content client, the
//! console). State is published through a `tokio::sync::watch` channel so
//! observers re-evaluate on change instead of polling.
//!
//! Lifecycle:
//! - `initialize()` verifies the persisted token once per store and always
//!   ends with `status = Resolved`.
//! - `login()` persists the new token, publishes the identity and navigates to
//!   the articles list.
//! - `logout()` / `handle_unauthorized()` clear token and identity locally and
//!   navigate to the login view.
//!
//! TRADE-OFFS
//! ==========
//! Every local mutation bumps a generation counter. A verification that
//! finishes after a login or logout has already happened only resolves the
//! status; it never overwrites the newer identity or clears a newer token.
//! The generation check and every token-storage write happen under the watch
//! sender's lock, so persisted state always matches the published snapshot.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{OnceCell, watch};
use tokio::task::JoinHandle;

use crate::backend::{AuthBackend, HttpAuthBackend};
use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::navigator::{Navigator, Route};
use crate::storage::{FileTokenStore, TokenStore};
use crate::types::{Credentials, LoginOutcome, SessionSnapshot, SessionStatus, User};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Email and password are required";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Shared handle to the current authentication session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionSnapshot>,
    initialized: OnceCell<()>,
    generation: AtomicU64,
    verify_timeout: Duration,
}

impl SessionStore {
    /// Create an unresolved, anonymous session.
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        verify_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                tokens,
                navigator,
                state,
                initialized: OnceCell::new(),
                generation: AtomicU64::new(0),
                verify_timeout,
            }),
        }
    }

    /// Wire the HTTP backend and file token store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &SessionConfig, navigator: Arc<dyn Navigator>) -> Result<Self, AuthError> {
        let backend = HttpAuthBackend::new(config)?;
        Ok(Self::new(
            Arc::new(backend),
            Arc::new(FileTokenStore::new(&config.token_file)),
            navigator,
            Duration::from_secs(config.timeouts.verify_secs),
        ))
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every published session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn identity(&self) -> Option<User> {
        self.inner.state.borrow().identity.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Verify the persisted token against the backend, once per store.
    ///
    /// Concurrent and repeated calls wait on the first verification and
    /// issue no further backend calls.
    pub async fn initialize(&self) {
        self.inner.initialized.get_or_init(|| self.verify_persisted()).await;
    }

    /// Sign in with email and password. Never fails; failures are outcomes.
    pub async fn login(&self, credentials: Credentials) -> LoginOutcome {
        if !credentials.is_complete() {
            return LoginOutcome::Failure { message: MISSING_CREDENTIALS_MESSAGE.to_owned() };
        }

        let grant = match self.inner.backend.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                tracing::warn!(email = %credentials.email, error = %e, "login failed");
                return LoginOutcome::Failure { message: login_failure_message(&e) };
            }
        };

        tracing::info!(user = %grant.user.label(), "login succeeded");
        let tokens = &self.inner.tokens;
        self.publish(|s| {
            if let Err(e) = tokens.save(&grant.token) {
                tracing::warn!(error = %e, "failed to persist session token");
            }
            s.identity = Some(grant.user);
            s.token = Some(grant.token);
            s.status = SessionStatus::Resolved;
        });
        self.inner.navigator.navigate(Route::Articles);
        LoginOutcome::Success
    }

    /// Sign out locally and notify the backend without waiting on it.
    ///
    /// Local state is cleared before the notification is even sent, so a
    /// failing or unreachable backend cannot keep the session alive. The
    /// returned handle lets short-lived hosts drain the notification before
    /// exiting; dropping it leaves the task running detached.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        self.clear_session();
        tracing::info!("logged out");
        self.inner.navigator.navigate(Route::Login);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no async runtime; skipping logout notification");
            return None;
        };
        let backend = Arc::clone(&self.inner.backend);
        Some(runtime.spawn(async move {
            if let Err(e) = backend.logout().await {
                tracing::debug!(error = %e, "logout notification failed");
            }
        }))
    }

    /// Treat a backend 401 on a protected call as an implicit logout.
    ///
    /// Returns `true` if a session was actually cleared; repeated rejections
    /// after the first do not navigate again.
    pub fn handle_unauthorized(&self) -> bool {
        let had_session = {
            let snap = self.inner.state.borrow();
            snap.identity.is_some() || snap.token.is_some()
        };
        if !had_session {
            return false;
        }
        self.clear_session();
        tracing::warn!("backend rejected session token; signed out");
        self.inner.navigator.navigate(Route::Login);
        true
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn verify_persisted(&self) {
        let token = match self.inner.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token");
                None
            }
        };

        let Some(token) = token else {
            tracing::info!("no persisted token; session resolved anonymous");
            self.inner.state.send_modify(|s| s.status = SessionStatus::Resolved);
            return;
        };

        let started = self.inner.generation.load(Ordering::SeqCst);
        let result = match tokio::time::timeout(self.inner.verify_timeout, self.inner.backend.verify(&token)).await {
            Ok(result) => result,
            Err(_) => Err(AuthError::Timeout(self.inner.verify_timeout.as_secs())),
        };

        match result {
            Ok(user) => {
                tracing::info!(user = %user.label(), "session verified");
                self.inner.state.send_modify(|s| {
                    if self.inner.generation.load(Ordering::SeqCst) == started {
                        s.identity = Some(user);
                        s.token = Some(token);
                    }
                    s.status = SessionStatus::Resolved;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "session verification failed; clearing token");
                self.inner.state.send_modify(|s| {
                    if self.inner.generation.load(Ordering::SeqCst) == started {
                        if let Err(e) = self.inner.tokens.clear() {
                            tracing::warn!(error = %e, "failed to clear persisted token");
                        }
                        s.identity = None;
                        s.token = None;
                    }
                    s.status = SessionStatus::Resolved;
                });
            }
        }
    }

    fn clear_session(&self) {
        let tokens = &self.inner.tokens;
        self.publish(|s| {
            if let Err(e) = tokens.clear() {
                tracing::warn!(error = %e, "failed to clear persisted token");
            }
            s.identity = None;
            s.token = None;
            s.status = SessionStatus::Resolved;
        });
    }

    /// Apply a local mutation and invalidate any verification in flight.
    ///
    /// Token storage writes belong inside `mutate`: the watch lock is the
    /// critical section that orders them against a verification outcome.
    fn publish(&self, mutate: impl FnOnce(&mut SessionSnapshot)) {
        self.inner.state.send_modify(|s| {
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            mutate(s);
        });
    }
}

/// User-facing message for a failed login.
pub(crate) fn login_failure_message(err: &AuthError) -> String {
    if let Some(message) = err.backend_message() {
        return message.to_owned();
    }
    match err {
        AuthError::Transport(_) | AuthError::Timeout(_) => LOGIN_FAILED_MESSAGE.to_owned(),
        AuthError::Rejected { .. } | AuthError::Malformed(_) => INVALID_CREDENTIALS_MESSAGE.to_owned(),
    }
}
