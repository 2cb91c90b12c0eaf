//! Auth Routes
//!
//! - GET /auth - Sign-in / sign-up tabs
//! - POST /auth/sign-in - Sign in, then go to the dashboard
//! - POST /auth/sign-up - Register; back to the sign-in tab until the email is verified
//! - POST /sign-out - Sign out, then go to the landing page
//!
//! Every POST answers with a redirect; outcomes travel as notifications.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{gate_view, Gated};
use crate::backend::Credentials;
use crate::session::View;
use crate::views::auth::{self, AuthPage, AuthQuery, SignInForm, SignUpForm, Tab};
use crate::views::Notification;
use crate::web::cookie_session;
use crate::web::error::WebResult;
use crate::web::state::AppState;

fn auth_path(tab: Tab) -> &'static str {
    match tab {
        Tab::SignIn => "/auth",
        Tab::SignUp => "/auth?tab=signup",
    }
}

/// GET /auth
pub async fn auth_page(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<AuthQuery>,
) -> WebResult<Response> {
    if let Gated::Respond(response) = gate_view(&state, &session, View::Auth).await? {
        return Ok(response);
    }

    let page = AuthPage {
        tab: query.tab(),
        signin_email: cookie_session::take_email(&session, Tab::SignIn)
            .await?
            .unwrap_or_default(),
        signup_email: cookie_session::take_email(&session, Tab::SignUp)
            .await?
            .unwrap_or_default(),
    };
    let notifications = cookie_session::take_notifications(&session).await?;
    Ok(auth::render(&page, &notifications).into_response())
}

/// POST /auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> WebResult<Response> {
    let credentials = Credentials::new(form.email.trim(), form.password);

    match state.sessions.sign_in(&credentials).await {
        Ok((id, _user)) => {
            // A new sign-in replaces whatever session this browser had.
            if let Some(previous) = cookie_session::session_id(&session).await? {
                state.sessions.sign_out(&previous).await;
            }
            cookie_session::set_session_id(&session, &id).await?;
            cookie_session::push_notification(
                &session,
                Notification::success("Signed in successfully!", "Welcome to your number vault"),
            )
            .await?;

            Ok(Redirect::to(View::Dashboard.path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");

            cookie_session::keep_email(&session, Tab::SignIn, &credentials.email).await?;
            cookie_session::push_notification(
                &session,
                Notification::destructive("Sign-in failed", e.user_message()),
            )
            .await?;

            Ok(Redirect::to(auth_path(Tab::SignIn)).into_response())
        }
    }
}

/// POST /auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> WebResult<Response> {
    let credentials = Credentials::new(form.email.trim(), form.password);

    let (notification, tab) = match state.sessions.sign_up(&credentials).await {
        Ok(()) => (
            Notification::success(
                "Signed up successfully!",
                "Check your email to verify your account",
            ),
            Tab::SignIn,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Sign-up failed");
            cookie_session::keep_email(&session, Tab::SignUp, &credentials.email).await?;
            (
                Notification::destructive("Sign-up failed", e.user_message()),
                Tab::SignUp,
            )
        }
    };
    cookie_session::push_notification(&session, notification).await?;

    Ok(Redirect::to(auth_path(tab)).into_response())
}

/// POST /sign-out
pub async fn sign_out(State(state): State<Arc<AppState>>, session: Session) -> WebResult<Response> {
    // Without a session there is nothing to sign out and nothing to store.
    if let Some(id) = cookie_session::session_id(&session).await? {
        state.sessions.sign_out(&id).await;
        cookie_session::clear_session_id(&session).await?;
        cookie_session::push_notification(
            &session,
            Notification::success("Signed out", "You can sign in again at any time"),
        )
        .await?;
    }

    Ok(Redirect::to(View::Landing.path()).into_response())
}
