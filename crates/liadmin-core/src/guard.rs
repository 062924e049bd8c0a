//! Route guard: decides allow-vs-redirect for a navigation target.
//!
//! Pure function over the current session. It must be re-evaluated on
//! every dispatch, never cached, because the session can change between
//! commands (login, logout, forced logout on 401).

use crate::session::Session;

/// Route the guard redirects to when authentication is missing.
pub const LOGIN_ROUTE: &str = "/login";
/// Route the guard redirects to when a public-only target is hit while
/// already authenticated.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// A navigation target, reduced to the one property the guard consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTarget {
    /// True for every admin view; false for public-only targets (login).
    pub requires_auth: bool,
}

impl RouteTarget {
    /// A protected admin view.
    pub fn protected() -> Self {
        Self {
            requires_auth: true,
        }
    }

    /// A public-only view such as the login screen.
    pub fn public_only() -> Self {
        Self {
            requires_auth: false,
        }
    }
}

/// Guard decision for a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested content.
    Allow,
    /// Navigate to the given route instead.
    RedirectTo(&'static str),
}

/// Decides whether to render `target` given the current session.
///
/// Only token presence is consulted; no other session field participates
/// in the authentication decision.
pub fn decide(target: RouteTarget, session: &Session) -> Decision {
    if target.requires_auth && !session.is_authenticated() {
        return Decision::RedirectTo(LOGIN_ROUTE);
    }

    if !target.requires_auth && session.is_authenticated() {
        return Decision::RedirectTo(DASHBOARD_ROUTE);
    }

    Decision::Allow
}
