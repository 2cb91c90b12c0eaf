//! Session Manager
//!
//! Front door to the auth provider. Signs users up, in and out, and
//! resolves the session state of each request, refreshing expired access
//! tokens in the background.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use super::hub::{SessionHub, SessionId};
use super::state::SessionState;
use crate::backend::{AuthSession, BackendError, Credentials, SessionProvider, User};

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// How long a request waits for a token refresh before showing the
    /// loading placeholder
    pub resolve_timeout: Duration,
    /// Refresh access tokens this long before they expire
    pub refresh_leeway: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_millis(1500),
            refresh_leeway: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    provider: Arc<dyn SessionProvider>,
    hub: Arc<SessionHub>,
    config: ManagerConfig,
}

impl SessionManager {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        hub: Arc<SessionHub>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            provider,
            hub,
            config,
        }
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    /// Register an account; never signs the user in
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<(), BackendError> {
        self.provider.sign_up(credentials).await?;
        tracing::info!(email = %credentials.email, "Account registered");
        Ok(())
    }

    /// Sign in and open a server-side session
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(SessionId, User), BackendError> {
        let auth = self.provider.sign_in(credentials).await?;
        let user = auth.user.clone();
        let id = self.hub.register(auth).await;

        tracing::info!(user_id = %user.id, "Signed in");
        Ok((id, user))
    }

    /// Sign out; the local session is dropped even if the provider fails
    pub async fn sign_out(&self, id: &str) {
        let Some(auth) = self.hub.unregister(id).await else {
            return;
        };

        match self.provider.sign_out(&auth).await {
            Ok(()) => tracing::info!(user_id = %auth.user.id, "Signed out"),
            Err(e) => tracing::warn!(
                user_id = %auth.user.id,
                error = %e,
                "Provider sign-out failed, session dropped locally"
            ),
        }
    }

    /// Tokens for data calls
    pub async fn auth(&self, id: &str) -> Option<AuthSession> {
        self.hub.auth(id).await
    }

    /// Resolve the session state for a request
    ///
    /// Fresh tokens resolve immediately. Expiring tokens are refreshed by a
    /// single background task; callers wait up to `resolve_timeout` and get
    /// `Resolving` if the refresh has not settled by then.
    pub async fn resolve(&self, id: Option<&str>) -> SessionState {
        let Some(id) = id else {
            return SessionState::SignedOut;
        };
        let Some(auth) = self.hub.auth(id).await else {
            return SessionState::SignedOut;
        };
        self.hub.touch(id).await;

        let issued_at = self.hub.issued_at(id).await.unwrap_or_else(Utc::now);
        let state = self.hub.state(id).await;
        if !state.is_resolving() && !auth.needs_refresh(issued_at, Utc::now(), self.leeway()) {
            return state;
        }

        if self.hub.begin_resolving(id).await {
            let manager = self.clone();
            let id = id.to_string();
            let refresh_token = auth.refresh_token.clone();
            tokio::spawn(async move {
                manager.refresh(&id, &refresh_token).await;
            });
        }

        let Ok(mut rx) = self.hub.subscribe(id).await else {
            return SessionState::SignedOut;
        };
        let settled = tokio::time::timeout(
            self.config.resolve_timeout,
            rx.wait_for(|s| !s.is_resolving()),
        )
        .await
        .map(|r| r.map(|s| s.clone()));

        match settled {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => SessionState::SignedOut,
            Err(_) => {
                tracing::debug!(session_id = %id, "Session still resolving");
                SessionState::Resolving
            }
        }
    }

    async fn refresh(&self, id: &str, refresh_token: &str) {
        match self.provider.refresh(refresh_token).await {
            Ok(auth) => {
                tracing::debug!(user_id = %auth.user.id, "Session refreshed");
                self.hub.settle(id, Some(auth)).await;
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "Session refresh failed");
                self.hub.settle(id, None).await;
            }
        }
    }

    fn leeway(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.config.refresh_leeway).unwrap_or(chrono::Duration::zero())
    }
}
