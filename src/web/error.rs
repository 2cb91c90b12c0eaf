//! Web Error Types
//!
//! Failures of the web layer itself. Backend failures never end up here;
//! they are shown to the user as notifications.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::views::layout;

/// Web layer error types
#[derive(Error, Debug)]
pub enum WebError {
    /// Cookie session store failed
    #[error("Session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let code = match &self {
            WebError::Session(_) => "SESSION_ERROR",
            WebError::Internal(_) => "INTERNAL_ERROR",
            WebError::Io(_) => "IO_ERROR",
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Web error occurred"
        );

        let message = format!("Please try again. (request id {})", request_id);
        (StatusCode::INTERNAL_SERVER_ERROR, layout::error_page(&message)).into_response()
    }
}

/// Result type for handlers
pub type WebResult<T> = Result<T, WebError>;
