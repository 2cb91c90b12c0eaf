//! Dashboard Routes
//!
//! - GET /dashboard - The user's numbers (`?add=1` opens the add dialog)
//! - POST /dashboard/numbers - Add a number
//! - POST /dashboard/numbers/:id/delete - Delete a number

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{gate_view, require_auth, Gated};
use crate::backend::{AuthSession, NewNumberEntry, NumberEntry};
use crate::session::View;
use crate::views::dashboard::{self, AddEntryForm, DashboardPage, DashboardQuery};
use crate::views::Notification;
use crate::web::cookie_session;
use crate::web::error::WebResult;
use crate::web::state::AppState;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> WebResult<Response> {
    let id = match gate_view(&state, &session, View::Dashboard).await? {
        Gated::Respond(response) => return Ok(response),
        Gated::Render { id } => id,
    };
    let auth = match id {
        Some(id) => state.sessions.auth(&id).await,
        None => None,
    };
    let Some(auth) = auth else {
        return Ok(Redirect::to(View::Landing.path()).into_response());
    };

    let mut notifications = cookie_session::take_notifications(&session).await?;
    let entries = fetch_entries(&state, &auth, &mut notifications).await;

    let page = DashboardPage {
        entries,
        dialog_open: query.dialog_open(),
        draft: AddEntryForm::default(),
        email: auth.user.email.clone(),
    };
    Ok(dashboard::render(&page, &notifications).into_response())
}

/// POST /dashboard/numbers
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<AddEntryForm>,
) -> WebResult<Response> {
    let auth = match require_auth(&state, &session).await? {
        Ok(auth) => auth,
        Err(response) => return Ok(response),
    };

    let entry = NewNumberEntry::new(
        auth.user.id.as_str(),
        form.title.as_str(),
        form.number_value.as_str(),
        form.description(),
    );

    match state.backend.insert(&auth, entry).await {
        Ok(()) => {
            tracing::info!(user_id = %auth.user.id, "Number saved");
            cookie_session::push_notification(
                &session,
                Notification::success(
                    "Number saved!",
                    format!("The number {} was added to your collection", form.title),
                ),
            )
            .await?;

            // The redirected GET fetches the list again.
            Ok(Redirect::to(View::Dashboard.path()).into_response())
        }
        Err(e) => {
            tracing::warn!(user_id = %auth.user.id, error = %e, "Failed to save number");

            let mut notifications = cookie_session::take_notifications(&session).await?;
            notifications.push(Notification::destructive(
                "Failed to save number",
                e.user_message(),
            ));
            let entries = fetch_entries(&state, &auth, &mut notifications).await;

            let page = DashboardPage {
                entries,
                dialog_open: true,
                draft: form,
                email: auth.user.email.clone(),
            };
            Ok(dashboard::render(&page, &notifications).into_response())
        }
    }
}

/// POST /dashboard/numbers/:id/delete
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(entry_id): Path<String>,
) -> WebResult<Response> {
    let auth = match require_auth(&state, &session).await? {
        Ok(auth) => auth,
        Err(response) => return Ok(response),
    };

    let notification = match state.backend.delete(&auth, &entry_id).await {
        Ok(()) => {
            tracing::info!(user_id = %auth.user.id, entry_id = %entry_id, "Number deleted");
            Notification::success("Number deleted", "The number was removed from your collection")
        }
        Err(e) => {
            tracing::warn!(
                user_id = %auth.user.id,
                entry_id = %entry_id,
                error = %e,
                "Failed to delete number"
            );
            Notification::destructive("Failed to delete number", e.user_message())
        }
    };
    cookie_session::push_notification(&session, notification).await?;

    // Refetch either way.
    Ok(Redirect::to(View::Dashboard.path()).into_response())
}

/// List the user's entries; a failure becomes a notification and an empty list
async fn fetch_entries(
    state: &AppState,
    auth: &AuthSession,
    notifications: &mut Vec<Notification>,
) -> Vec<NumberEntry> {
    match state.backend.list(auth).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(user_id = %auth.user.id, error = %e, "Failed to load numbers");
            notifications.push(Notification::destructive(
                "Failed to load numbers",
                e.user_message(),
            ));
            Vec::new()
        }
    }
}
