//! In-memory backend
//!
//! Same observable contract as Supabase, kept in process. Accounts are
//! confirmed on sign-up, tokens are random UUIDs with an expiry, and rows
//! are only visible to their owner.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{BackendError, BackendResult};
use super::types::{AuthSession, Credentials, NewNumberEntry, NumberEntry, User};
use super::{Backend, NumberStore, SessionProvider};

const MIN_PASSWORD_LEN: usize = 6;

/// In-process backend
pub struct MemoryBackend {
    accounts: RwLock<HashMap<String, Account>>,
    /// access token → (user id, expiry)
    access_tokens: RwLock<HashMap<String, TokenGrant>>,
    /// refresh token → user id
    refresh_tokens: RwLock<HashMap<String, String>>,
    rows: RwLock<Vec<NumberEntry>>,
    token_ttl: Duration,
}

struct Account {
    user: User,
    password: String,
}

struct TokenGrant {
    user_id: String,
    expires_at: chrono::DateTime<Utc>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty backend with one-hour access tokens
    pub fn new() -> Self {
        Self::with_token_ttl(Duration::hours(1))
    }

    /// Create an empty backend issuing tokens valid for `ttl`
    pub fn with_token_ttl(ttl: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            access_tokens: RwLock::new(HashMap::new()),
            refresh_tokens: RwLock::new(HashMap::new()),
            rows: RwLock::new(Vec::new()),
            token_ttl: ttl,
        }
    }

    /// Number of stored rows across all users
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn issue(&self, user: User) -> AuthSession {
        let access_token = Uuid::new_v4().to_string();
        let refresh_token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + self.token_ttl;

        self.access_tokens.write().await.insert(
            access_token.clone(),
            TokenGrant {
                user_id: user.id.clone(),
                expires_at,
            },
        );
        self.refresh_tokens
            .write()
            .await
            .insert(refresh_token.clone(), user.id.clone());

        AuthSession {
            access_token,
            refresh_token,
            expires_at,
            user,
        }
    }

    /// Resolve the caller's user id from their access token
    async fn caller(&self, session: &AuthSession) -> BackendResult<String> {
        let tokens = self.access_tokens.read().await;
        match tokens.get(&session.access_token) {
            Some(grant) if grant.expires_at > Utc::now() => Ok(grant.user_id.clone()),
            Some(_) => Err(BackendError::Unauthorized("JWT expired".to_string())),
            None => Err(BackendError::Unauthorized("Invalid JWT".to_string())),
        }
    }

    async fn user_by_id(&self, user_id: &str) -> Option<User> {
        self.accounts
            .read()
            .await
            .values()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
    }
}

fn bad_request(message: &str) -> BackendError {
    BackendError::Api {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl SessionProvider for MemoryBackend {
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<()> {
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::Api {
                status: 422,
                message: format!(
                    "Password should be at least {} characters.",
                    MIN_PASSWORD_LEN
                ),
            });
        }

        let email = credentials.email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(bad_request("User already registered"));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: Some(email.clone()),
        };
        tracing::debug!(user_id = %user.id, "Registered in-memory account");
        accounts.insert(
            email,
            Account {
                user,
                password: credentials.password.clone(),
            },
        );

        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<AuthSession> {
        let email = credentials.email.trim().to_lowercase();
        let user = {
            let accounts = self.accounts.read().await;
            match accounts.get(&email) {
                Some(account) if account.password == credentials.password => account.user.clone(),
                _ => return Err(bad_request("Invalid login credentials")),
            }
        };

        Ok(self.issue(user).await)
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<AuthSession> {
        // Refresh tokens are single use.
        let user_id = self
            .refresh_tokens
            .write()
            .await
            .remove(refresh_token)
            .ok_or_else(|| bad_request("Invalid Refresh Token: Refresh Token Not Found"))?;

        let user = self
            .user_by_id(&user_id)
            .await
            .ok_or_else(|| bad_request("User not found"))?;

        Ok(self.issue(user).await)
    }

    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()> {
        self.access_tokens
            .write()
            .await
            .remove(&session.access_token);
        self.refresh_tokens
            .write()
            .await
            .remove(&session.refresh_token);
        Ok(())
    }
}

#[async_trait]
impl NumberStore for MemoryBackend {
    async fn list(&self, session: &AuthSession) -> BackendResult<Vec<NumberEntry>> {
        let owner = self.caller(session).await?;

        let mut entries: Vec<NumberEntry> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.user_id == owner)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries)
    }

    async fn insert(&self, session: &AuthSession, entry: NewNumberEntry) -> BackendResult<()> {
        let owner = self.caller(session).await?;
        if entry.user_id != owner {
            return Err(BackendError::Api {
                status: 403,
                message: "new row violates row-level security policy for table \"numbers\""
                    .to_string(),
            });
        }

        self.rows.write().await.push(NumberEntry {
            id: Uuid::new_v4().to_string(),
            user_id: entry.user_id,
            title: entry.title,
            number_value: entry.number_value,
            description: entry.description,
            created_at: Utc::now(),
        });

        Ok(())
    }

    async fn delete(&self, session: &AuthSession, id: &str) -> BackendResult<()> {
        let owner = self.caller(session).await?;

        // Rows of other users are invisible, so deleting them is a no-op.
        self.rows
            .write()
            .await
            .retain(|row| !(row.id == id && row.user_id == owner));

        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> BackendResult<()> {
        Ok(())
    }
}
