//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits in front of anything in the protected CMS area. It only reads the
//! session; it never verifies tokens itself.
//!
//! DESIGN
//! ======
//! Explicit state machine over the session's `(status, identity)` pair:
//!
//! ```text
//! Checking --resolved, identity--> Authorized
//! Checking --resolved, none------> Redirecting   (one navigation to /login)
//! Authorized --identity cleared--> Redirecting   (one navigation to /login)
//! ```
//!
//! Nothing moves while the session is unresolved, so a slow startup
//! verification never causes a premature redirect. `Redirecting` is terminal
//! for a guard instance.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::navigator::{Navigator, Route};
use crate::types::SessionSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Redirecting,
    Authorized,
}

/// What a guarded view shows for the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered<T> {
    /// Waiting indicator; shown while checking and while redirecting.
    Waiting,
    Content(T),
}

/// Transition function for the guard, independent of side effects.
#[must_use]
pub fn next_state(current: GuardState, session: &SessionSnapshot) -> GuardState {
    match current {
        GuardState::Redirecting => GuardState::Redirecting,
        _ if !session.is_resolved() => current,
        GuardState::Checking | GuardState::Authorized => {
            if session.is_authenticated() {
                GuardState::Authorized
            } else {
                GuardState::Redirecting
            }
        }
    }
}

pub struct RouteGuard {
    state: GuardState,
    mounted: bool,
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    /// New guard, not yet mounted. Observations are ignored until `mount()`.
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { state: GuardState::Checking, mounted: false, navigator }
    }

    /// Mark the guarded view as mounted so observations take effect.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Protected content may be shown only in `Authorized`.
    #[must_use]
    pub fn can_render(&self) -> bool {
        self.state == GuardState::Authorized
    }

    /// Run `content` only when authorized; otherwise show the waiting state.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Rendered<T> {
        if self.can_render() { Rendered::Content(content()) } else { Rendered::Waiting }
    }

    /// Re-evaluate against a session snapshot, navigating on entry to
    /// `Redirecting`.
    pub fn observe(&mut self, session: &SessionSnapshot) -> GuardState {
        if !self.mounted {
            return self.state;
        }
        let next = next_state(self.state, session);
        if next == GuardState::Redirecting && self.state != GuardState::Redirecting {
            tracing::info!(from = ?self.state, "no session; redirecting to login");
            self.navigator.navigate(Route::Login);
        }
        self.state = next;
        next
    }

    /// Mount, then follow `session` until the guard leaves `Checking`.
    ///
    /// Returns the settled state. If the store is dropped while still
    /// unresolved the guard stays in `Checking`.
    pub async fn wait(&mut self, session: &mut watch::Receiver<SessionSnapshot>) -> GuardState {
        self.mount();
        loop {
            let snapshot = session.borrow_and_update().clone();
            if self.observe(&snapshot) != GuardState::Checking {
                return self.state;
            }
            if session.changed().await.is_err() {
                return self.state;
            }
        }
    }
}
