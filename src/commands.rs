//! Console command handlers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each invocation is one short "application lifetime": build the session
//! store, verify the persisted token once, then run a single command. Content
//! commands and `whoami` sit behind a `RouteGuard`, so they only run for a
//! resolved, signed-in session.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use session::{
    AuthError, ContentClient, ContentError, Credentials, GuardState, LoginOutcome, Navigator, Resource, Route,
    RouteGuard, SessionConfig, SessionStore,
};

/// How long `logout` waits for the backend notification before exiting.
const LOGOUT_DRAIN: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("session setup failed: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("not signed in; run `newsdesk login --email <email>` first")]
    NotSignedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("--data must be a JSON object")]
    NotAnObject,
    #[error("--query is only supported for articles, not {0}")]
    QueryNotSupported(Resource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    List { query: Option<String> },
    Get { id: String },
    Create { data: String },
    Update { id: String, data: String },
}

/// Session config from the environment, with CLI flags taking precedence.
pub fn resolve_config(backend_url: Option<&str>, token_file: Option<PathBuf>) -> SessionConfig {
    let mut config = SessionConfig::from_env();
    if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
        config.backend_url = url.trim().trim_end_matches('/').to_owned();
    }
    if let Some(path) = token_file {
        config.token_file = path;
    }
    config
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Renders navigation requests as hints on stderr.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("{}", route_hint(route));
    }
}

fn route_hint(route: Route) -> String {
    match route {
        Route::Login => format!("-> {route}: sign in with `newsdesk login --email <email>`"),
        Route::Articles => format!("-> {route}: try `newsdesk articles list`"),
    }
}

// =============================================================================
// CONSOLE
// =============================================================================

pub struct Console {
    config: SessionConfig,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Console {
    /// Build the session store and run the startup verification.
    pub async fn connect(config: SessionConfig) -> Result<Self, CliError> {
        let navigator: Arc<dyn Navigator> = Arc::new(ConsoleNavigator);
        let store = SessionStore::from_config(&config, navigator.clone())?;
        store.initialize().await;
        tracing::debug!(authenticated = store.is_authenticated(), "session resolved");
        Ok(Self { config, store, navigator })
    }

    pub async fn login(&self, email: String, password: String) -> Result<(), CliError> {
        match self.store.login(Credentials::new(email, password)).await {
            LoginOutcome::Success => {
                let label = self.store.identity().map(|u| u.label()).unwrap_or_default();
                println!("signed in as {label}");
                Ok(())
            }
            LoginOutcome::Failure { message } => Err(CliError::LoginFailed(message)),
        }
    }

    pub async fn logout(&self) -> Result<(), CliError> {
        if let Some(notify) = self.store.logout() {
            if tokio::time::timeout(LOGOUT_DRAIN, notify).await.is_err() {
                tracing::debug!("logout notification still pending at exit");
            }
        }
        println!("signed out");
        Ok(())
    }

    pub async fn whoami(&self) -> Result<(), CliError> {
        self.require_session().await?;
        let user = self.store.identity().ok_or(CliError::NotSignedIn)?;
        print_json(&user.0)
    }

    pub async fn content(&self, resource: Resource, action: ContentAction) -> Result<(), CliError> {
        self.require_session().await?;
        let client = ContentClient::new(&self.config, self.store.clone())?;

        let json = match action {
            ContentAction::List { query: None } => client.list(resource).await?,
            ContentAction::List { query: Some(query) } => {
                if resource != Resource::Articles {
                    return Err(CliError::QueryNotSupported(resource));
                }
                client.list_articles(&query).await?
            }
            ContentAction::Get { id } => client.get(resource, &id).await?,
            ContentAction::Create { data } => client.create(resource, &parse_data(&data)?).await?,
            ContentAction::Update { id, data } => client.update(resource, &id, &parse_data(&data)?).await?,
        };
        print_json(&json)
    }

    /// Gate for the protected area.
    async fn require_session(&self) -> Result<(), CliError> {
        let mut guard = RouteGuard::new(self.navigator.clone());
        let mut session = self.store.subscribe();
        match guard.wait(&mut session).await {
            GuardState::Authorized => Ok(()),
            GuardState::Checking | GuardState::Redirecting => Err(CliError::NotSignedIn),
        }
    }
}

fn parse_data(raw: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_object() { Ok(value) } else { Err(CliError::NotAnObject) }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
