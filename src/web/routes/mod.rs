//! Route handlers
//!
//! Handlers organized by view, plus the session checks they share.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod landing;

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use super::cookie_session;
use super::error::WebResult;
use super::state::AppState;
use crate::backend::AuthSession;
use crate::session::{gate, Gate, SessionId, SessionState, View};
use crate::views::layout;

/// Outcome of gating a view on the current session
pub(crate) enum Gated {
    /// The view must not render; send this instead
    Respond(Response),
    /// Render the view
    Render { id: Option<SessionId> },
}

/// Resolve the request's session and apply the view's gate
pub(crate) async fn gate_view(app: &AppState, session: &Session, view: View) -> WebResult<Gated> {
    let id = cookie_session::session_id(session).await?;
    let state = app.sessions.resolve(id.as_deref()).await;

    // The hub no longer knows this session (expired, refresh failed).
    if id.is_some() && state == SessionState::SignedOut {
        cookie_session::clear_session_id(session).await?;
    }

    Ok(match gate(view, &state) {
        Gate::Loading => Gated::Respond(layout::loading().into_response()),
        Gate::Redirect(to) => Gated::Respond(Redirect::to(to).into_response()),
        Gate::Render => Gated::Render { id },
    })
}

/// Tokens for a mutation, or where to send the browser instead
///
/// Mutations never render the loading page; a resolving session goes back
/// to the dashboard, which shows it.
pub(crate) async fn require_auth(
    app: &AppState,
    session: &Session,
) -> WebResult<Result<AuthSession, Response>> {
    let id = cookie_session::session_id(session).await?;

    match app.sessions.resolve(id.as_deref()).await {
        SessionState::SignedIn(_) => {}
        SessionState::Resolving => {
            return Ok(Err(Redirect::to(View::Dashboard.path()).into_response()))
        }
        SessionState::SignedOut => {
            if id.is_some() {
                cookie_session::clear_session_id(session).await?;
            }
            return Ok(Err(Redirect::to(View::Landing.path()).into_response()));
        }
    }

    let auth = match id {
        Some(id) => app.sessions.auth(&id).await,
        None => None,
    };
    Ok(auth.ok_or_else(|| Redirect::to(View::Landing.path()).into_response()))
}
