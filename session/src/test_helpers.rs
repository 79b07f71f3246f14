//! Shared fakes for unit tests: scripted backend, recording navigator and a
//! token store that counts writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::backend::AuthBackend;
use crate::error::{AuthError, StorageError};
use crate::navigator::{Navigator, Route};
use crate::storage::{MemoryTokenStore, TokenStore};
use crate::store::SessionStore;
use crate::types::{Credentials, LoginGrant, User};

pub fn sample_user() -> User {
    User(json!({"id": 1, "email": "a@b.com"}))
}

// =============================================================================
// BACKEND
// =============================================================================

/// How the fake login endpoint should answer.
#[derive(Clone)]
pub enum LoginScript {
    Grant(LoginGrant),
    Reject { status: u16, message: Option<String> },
    Unreachable,
}

pub struct FakeBackend {
    pub verify_user: Option<User>,
    pub verify_delay: Option<Duration>,
    pub login: LoginScript,
    pub logout_fails: bool,
    pub verify_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub logout_seen: Notify,
    pub verified_tokens: Mutex<Vec<String>>,
}

impl FakeBackend {
    /// Backend that accepts any token and any credentials.
    pub fn accepting() -> Self {
        Self {
            verify_user: Some(sample_user()),
            verify_delay: None,
            login: LoginScript::Grant(LoginGrant { token: "fresh-token".to_owned(), user: sample_user() }),
            logout_fails: false,
            verify_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            logout_seen: Notify::new(),
            verified_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Backend that rejects every token with 401.
    pub fn rejecting() -> Self {
        Self { verify_user: None, ..Self::accepting() }
    }

    pub fn with_verify_delay(mut self, delay: Duration) -> Self {
        self.verify_delay = Some(delay);
        self
    }

    pub fn with_login(mut self, login: LoginScript) -> Self {
        self.login = login;
        self
    }

    pub fn with_failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn login_count(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn logout_count(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn verify(&self, token: &str) -> Result<User, AuthError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verified_tokens.lock().unwrap().push(token.to_owned());
        if let Some(delay) = self.verify_delay {
            tokio::time::sleep(delay).await;
        }
        self.verify_user
            .clone()
            .ok_or(AuthError::Rejected { status: 401, message: None })
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match &self.login {
            LoginScript::Grant(grant) => Ok(grant.clone()),
            LoginScript::Reject { status, message } => {
                Err(AuthError::Rejected { status: *status, message: message.clone() })
            }
            LoginScript::Unreachable => Err(AuthError::Transport("connection refused".to_owned())),
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout_seen.notify_one();
        if self.logout_fails {
            Err(AuthError::Transport("connection reset".to_owned()))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

// =============================================================================
// TOKEN STORE
// =============================================================================

/// In-memory token store that counts reads and writes.
#[derive(Default)]
pub struct CountingTokenStore {
    inner: MemoryTokenStore,
    pub loads: AtomicUsize,
    pub saves: AtomicUsize,
    pub clears: AtomicUsize,
}

impl CountingTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self { inner: MemoryTokenStore::with_token(token), ..Self::default() }
    }

    pub fn current(&self) -> Option<String> {
        self.inner.load().unwrap()
    }

    pub fn writes(&self) -> usize {
        self.saves.load(Ordering::SeqCst) + self.clears.load(Ordering::SeqCst)
    }
}

impl TokenStore for CountingTokenStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(token)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

/// Token store whose first `clear()` announces itself and then holds until
/// `release_clear()` is called.
pub struct HeldClearStore {
    inner: MemoryTokenStore,
    pub clear_started: Notify,
    release_tx: Mutex<Option<mpsc::Sender<()>>>,
    release_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl HeldClearStore {
    pub fn with_token(token: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            inner: MemoryTokenStore::with_token(token),
            clear_started: Notify::new(),
            release_tx: Mutex::new(Some(tx)),
            release_rx: Mutex::new(Some(rx)),
        }
    }

    pub fn release_clear(&self) {
        if let Some(tx) = self.release_tx.lock().unwrap().take() {
            tx.send(()).unwrap();
        }
    }

    pub fn current(&self) -> Option<String> {
        self.inner.load().unwrap()
    }
}

impl TokenStore for HeldClearStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.inner.load()
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        self.inner.save(token)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let held = self.release_rx.lock().unwrap().take();
        if let Some(rx) = held {
            self.clear_started.notify_one();
            rx.recv().unwrap();
        }
        self.inner.clear()
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub store: SessionStore,
    pub backend: Arc<FakeBackend>,
    pub tokens: Arc<CountingTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(backend: FakeBackend, tokens: CountingTokenStore) -> Harness {
    harness_with_timeout(backend, tokens, Duration::from_secs(5))
}

pub fn harness_with_timeout(backend: FakeBackend, tokens: CountingTokenStore, verify_timeout: Duration) -> Harness {
    let backend = Arc::new(backend);
    let tokens = Arc::new(tokens);
    let navigator = Arc::new(RecordingNavigator::default());
    let store = SessionStore::new(backend.clone(), tokens.clone(), navigator.clone(), verify_timeout);
    Harness { store, backend, tokens, navigator }
}
