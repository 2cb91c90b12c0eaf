//! Session Hub
//!
//! Server-side registry of signed-in browser sessions. The browser only
//! holds an opaque session id; tokens stay here. Each slot publishes its
//! `SessionState` on a watch channel so concurrent requests can wait for a
//! token refresh to settle.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::state::SessionState;
use crate::backend::AuthSession;

/// Opaque identifier kept in the browser's cookie session
pub type SessionId = String;

/// Registry of signed-in sessions
pub struct SessionHub {
    slots: RwLock<HashMap<SessionId, SessionSlot>>,
    config: HubConfig,
}

/// Configuration for the session hub
///
/// Both limits evict the least recently seen session instead of refusing a
/// new sign-in.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrently signed-in sessions
    pub max_sessions: usize,
    /// Maximum number of sessions one user may hold
    pub max_sessions_per_user: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            max_sessions_per_user: 10,
        }
    }
}

struct SessionSlot {
    auth: AuthSession,
    /// When the current tokens were handed out
    issued_at: DateTime<Utc>,
    state: watch::Sender<SessionState>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new(auth: AuthSession) -> Self {
        let (state, _) = watch::channel(SessionState::SignedIn(auth.user.clone()));
        Self {
            auth,
            issued_at: Utc::now(),
            state,
            last_seen: Instant::now(),
        }
    }
}

/// Remove the least recently seen slot matching `pred`
fn evict_oldest(
    slots: &mut HashMap<SessionId, SessionSlot>,
    pred: impl Fn(&SessionSlot) -> bool,
) -> Option<SessionId> {
    let oldest = slots
        .iter()
        .filter(|(_, slot)| pred(slot))
        .min_by_key(|(_, slot)| slot.last_seen)
        .map(|(id, _)| id.clone())?;

    if let Some(slot) = slots.remove(&oldest) {
        slot.state.send_replace(SessionState::SignedOut);
    }
    Some(oldest)
}

impl SessionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a freshly signed-in session
    ///
    /// When the user or the hub is at its limit, the least recently seen
    /// session (of that user, or overall) is signed out to make room.
    pub async fn register(&self, auth: AuthSession) -> SessionId {
        let mut slots = self.slots.write().await;
        let user_id = auth.user.id.clone();

        let owned = slots
            .values()
            .filter(|slot| slot.auth.user.id == user_id)
            .count();
        if owned >= self.config.max_sessions_per_user.max(1) {
            if let Some(evicted) = evict_oldest(&mut slots, |slot| slot.auth.user.id == user_id) {
                tracing::info!(session_id = %evicted, user_id = %user_id, "Evicted user's oldest session");
            }
        }
        if slots.len() >= self.config.max_sessions.max(1) {
            if let Some(evicted) = evict_oldest(&mut slots, |_| true) {
                tracing::info!(session_id = %evicted, "Hub full, evicted least recently seen session");
            }
        }

        let id = Uuid::new_v4().to_string();
        tracing::debug!(session_id = %id, user_id = %user_id, "Session registered");
        slots.insert(id.clone(), SessionSlot::new(auth));

        id
    }

    /// Drop a session, telling any waiters it is gone
    pub async fn unregister(&self, id: &str) -> Option<AuthSession> {
        let slot = self.slots.write().await.remove(id)?;
        slot.state.send_replace(SessionState::SignedOut);

        tracing::debug!(session_id = %id, "Session unregistered");
        Some(slot.auth)
    }

    /// Current tokens for a session
    pub async fn auth(&self, id: &str) -> Option<AuthSession> {
        self.slots.read().await.get(id).map(|s| s.auth.clone())
    }

    /// When the session's current tokens were issued
    pub async fn issued_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.slots.read().await.get(id).map(|s| s.issued_at)
    }

    /// Current state of a session; unknown ids are signed out
    pub async fn state(&self, id: &str) -> SessionState {
        self.slots
            .read()
            .await
            .get(id)
            .map(|s| s.state.borrow().clone())
            .unwrap_or(SessionState::SignedOut)
    }

    /// Watch a session's state
    pub async fn subscribe(&self, id: &str) -> Result<watch::Receiver<SessionState>, HubError> {
        self.slots
            .read()
            .await
            .get(id)
            .map(|s| s.state.subscribe())
            .ok_or(HubError::SessionNotFound)
    }

    /// Mark a session as resolving
    ///
    /// Returns true only for the caller that flipped the state, so exactly
    /// one refresh runs per session.
    pub async fn begin_resolving(&self, id: &str) -> bool {
        let slots = self.slots.read().await;
        let Some(slot) = slots.get(id) else {
            return false;
        };

        slot.state.send_if_modified(|state| {
            if state.is_resolving() {
                false
            } else {
                *state = SessionState::Resolving;
                true
            }
        })
    }

    /// Finish a refresh: new tokens keep the session, `None` drops it
    pub async fn settle(&self, id: &str, auth: Option<AuthSession>) {
        match auth {
            Some(auth) => {
                let mut slots = self.slots.write().await;
                if let Some(slot) = slots.get_mut(id) {
                    let user = auth.user.clone();
                    slot.auth = auth;
                    slot.issued_at = Utc::now();
                    slot.state.send_replace(SessionState::SignedIn(user));
                }
            }
            None => {
                self.unregister(id).await;
            }
        }
    }

    /// Record activity on a session
    pub async fn touch(&self, id: &str) {
        if let Some(slot) = self.slots.write().await.get_mut(id) {
            slot.last_seen = Instant::now();
        }
    }

    /// Drop sessions idle for longer than `max_idle`
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut slots = self.slots.write().await;
        let before = slots.len();

        slots.retain(|_, slot| {
            let keep = slot.last_seen.elapsed() <= max_idle;
            if !keep {
                slot.state.send_replace(SessionState::SignedOut);
            }
            keep
        });

        before - slots.len()
    }

    /// Start a background task that prunes idle sessions every `interval`
    pub fn start_pruning(self: Arc<Self>, interval: Duration, max_idle: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let pruned = self.prune_idle(max_idle).await;
                if pruned > 0 {
                    tracing::info!(pruned, "Pruned idle sessions");
                }
            }
        })
    }

    /// Number of signed-in sessions
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Errors that can occur in the session hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Session not found")]
    SessionNotFound,
}
