//! Navigation side effects.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store and the guard never decide how a route is shown; they hand a
//! typed `Route` to whatever the host injected (browser router, console
//! printer, test recorder).

use std::fmt;

/// Destinations the session core can redirect to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login view; target of every unauthenticated redirect.
    Login,
    /// Articles list inside the protected CMS area.
    Articles,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Articles => "/cms/articles",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receiver of navigation requests.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route);
    }
}
