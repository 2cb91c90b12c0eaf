//! Landing Route
//!
//! - GET / - Public entry point; signed-in users go straight to the dashboard

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{gate_view, Gated};
use crate::session::View;
use crate::views::landing;
use crate::web::cookie_session;
use crate::web::error::WebResult;
use crate::web::state::AppState;

/// GET /
pub async fn landing(State(state): State<Arc<AppState>>, session: Session) -> WebResult<Response> {
    if let Gated::Respond(response) = gate_view(&state, &session, View::Landing).await? {
        return Ok(response);
    }

    let notifications = cookie_session::take_notifications(&session).await?;
    Ok(landing::render(&notifications).into_response())
}
