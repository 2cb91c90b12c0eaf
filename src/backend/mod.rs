//! Backend collaborators
//!
//! Authentication and persistence are delegated to an external
//! backend-as-a-service. This module defines the two seams the rest of the
//! app talks to, plus the implementations behind them:
//!
//! - **SessionProvider**: sign-up, sign-in, token refresh, sign-out
//! - **NumberStore**: list, insert and delete rows of the `numbers` table
//! - **SupabaseBackend**: GoTrue + PostgREST over HTTP
//! - **MemoryBackend**: in-process stand-in for local development and tests

mod error;
mod memory;
mod supabase;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{BackendError, BackendResult};
pub use memory::MemoryBackend;
pub use supabase::{SupabaseBackend, SupabaseConfig};
pub use types::{AuthSession, Credentials, NewNumberEntry, NumberEntry, User};

use async_trait::async_trait;

/// External auth provider
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Register a new account
    ///
    /// Succeeding does not sign the user in; the provider is expected to
    /// ask for email verification first.
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<()>;

    /// Exchange email and password for a session
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<AuthSession>;

    /// Exchange a refresh token for a fresh session
    async fn refresh(&self, refresh_token: &str) -> BackendResult<AuthSession>;

    /// Revoke the session at the provider
    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()>;
}

/// Remote `numbers` table, always accessed on behalf of a signed-in user
#[async_trait]
pub trait NumberStore: Send + Sync {
    /// All entries owned by the session's user, newest first
    async fn list(&self, session: &AuthSession) -> BackendResult<Vec<NumberEntry>>;

    /// Insert a single entry
    async fn insert(&self, session: &AuthSession, entry: NewNumberEntry) -> BackendResult<()>;

    /// Delete an entry by id
    async fn delete(&self, session: &AuthSession, id: &str) -> BackendResult<()>;
}

/// A complete backend: auth provider and table store behind one connection
#[async_trait]
pub trait Backend: SessionProvider + NumberStore {
    /// Short name used in logs and health output
    fn name(&self) -> &str;

    /// Check whether the backend answers
    async fn health_check(&self) -> BackendResult<()>;
}
