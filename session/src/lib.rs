//! # session
//!
//! Authenticated-session core for the newsdesk CMS console: the
//! `SessionStore` owning the bearer token lifecycle, the `RouteGuard` gating
//! protected views, and the REST clients they sit on.
//!
//! Hosts construct one `SessionStore`, call `initialize()` at startup, and
//! hand clones of it to every guard and client that needs the session.

pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod storage;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use backend::{AuthBackend, HttpAuthBackend};
pub use config::SessionConfig;
pub use content::{ContentClient, Resource};
pub use error::{AuthError, ContentError, StorageError};
pub use guard::{GuardState, Rendered, RouteGuard};
pub use navigator::{Navigator, Route};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::SessionStore;
pub use types::{Credentials, LoginGrant, LoginOutcome, SessionSnapshot, SessionStatus, User};
