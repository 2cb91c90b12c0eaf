//! Session state and view gating
//!
//! Every view asks `gate` what to do with the current session before it
//! renders anything. While the session is still resolving, all views show
//! the loading placeholder so signed-in users never see signed-out content.

use crate::backend::User;

/// Session state as observed by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Tokens are being refreshed; the outcome is not known yet
    Resolving,
    /// No session
    SignedOut,
    /// A valid session for this user
    SignedIn(User),
}

impl SessionState {
    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Routed views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Auth,
    Dashboard,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Landing => "/",
            View::Auth => "/auth",
            View::Dashboard => "/dashboard",
        }
    }
}

/// What a view should do for a given session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Show the loading placeholder
    Loading,
    /// Render the view's own content
    Render,
    /// Navigate elsewhere
    Redirect(&'static str),
}

/// Decide what `view` does for `state`
pub fn gate(view: View, state: &SessionState) -> Gate {
    match (view, state) {
        (_, SessionState::Resolving) => Gate::Loading,
        (View::Landing | View::Auth, SessionState::SignedIn(_)) => {
            Gate::Redirect(View::Dashboard.path())
        }
        (View::Landing | View::Auth, SessionState::SignedOut) => Gate::Render,
        (View::Dashboard, SessionState::SignedIn(_)) => Gate::Render,
        (View::Dashboard, SessionState::SignedOut) => Gate::Redirect(View::Landing.path()),
    }
}
