//! Core data types shared by every backend
//!
//! - `NumberEntry`: a stored number record as returned by the store
//! - `NewNumberEntry`: the insert payload
//! - `User` / `AuthSession`: identity and tokens handed out by the auth provider
//! - `Credentials`: email + password as submitted by a form

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single stored number record
///
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumberEntry {
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    pub title: String,
    /// Free text, not validated as a phone number
    pub number_value: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `numbers` table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewNumberEntry {
    pub user_id: String,
    pub title: String,
    pub number_value: String,
    pub description: Option<String>,
}

impl NewNumberEntry {
    /// Build an insert scoped to `user_id`
    ///
    /// A blank description is stored as `null`.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        number_value: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            number_value: number_value.into(),
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Authenticated identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens for one signed-in user
#[derive(Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl AuthSession {
    /// True when the access token expires within `leeway` of `now`
    ///
    /// The leeway is capped at half the lifetime the token was issued with,
    /// so short-lived tokens are not refreshed again right after issue.
    pub fn needs_refresh(
        &self,
        issued_at: DateTime<Utc>,
        now: DateTime<Utc>,
        leeway: Duration,
    ) -> bool {
        let half_life = (self.expires_at - issued_at) / 2;
        let leeway = leeway.min(half_life).max(Duration::zero());
        self.expires_at - leeway <= now
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Email and password as submitted by a form
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
