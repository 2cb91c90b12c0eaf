//! Backend error types
//!
//! Every failure of the auth provider or the remote table ends up here.
//! The web layer never interprets these; it shows `user_message()` to the user.

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Map a transport failure the same way for every call
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Unavailable
        } else {
            BackendError::Request(err)
        }
    }

    /// The message shown to the user
    ///
    /// Provider messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Api { message, .. } | BackendError::Unauthorized(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_verbatim() {
        let err = BackendError::Api {
            status: 400,
            message: "Invalid login credentials".into(),
        };
        assert_eq!(err.user_message(), "Invalid login credentials");

        let err = BackendError::Unauthorized("JWT expired".into());
        assert_eq!(err.user_message(), "JWT expired");

        assert_eq!(BackendError::Timeout.user_message(), "Request timeout");
    }
}
