//! Supabase REST Client
//!
//! Talks to a Supabase project over HTTP:
//! - GoTrue (`/auth/v1`) for sign-up, sign-in, refresh and sign-out
//! - PostgREST (`/rest/v1`) for the `numbers` table
//!
//! Every request carries the project's anon key. Table requests also carry
//! the user's access token so row-level security applies.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::error::{BackendError, BackendResult};
use super::types::{AuthSession, Credentials, NewNumberEntry, NumberEntry, User};
use super::{Backend, NumberStore, SessionProvider};

/// Supabase backend
pub struct SupabaseBackend {
    client: Client,
    config: SupabaseConfig,
}

/// Configuration for the Supabase backend
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://abc.supabase.co")
    pub url: String,
    /// Public anon key
    pub anon_key: String,
    /// Table holding the number entries
    pub table: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            table: "numbers".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SupabaseBackend {
    /// Create a new Supabase backend with the given configuration
    pub fn new(config: SupabaseConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    /// Attach the project key to a request
    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.config.anon_key)
    }

    /// Attach the project key and a user's bearer token
    fn as_user(&self, request: RequestBuilder, session: &AuthSession) -> RequestBuilder {
        self.with_key(request).bearer_auth(&session.access_token)
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request.send().await.map_err(BackendError::from_transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }

    async fn token_grant<T: Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &T,
    ) -> BackendResult<AuthSession> {
        let request = self
            .with_key(self.client.post(self.auth_url("token")))
            .query(&[("grant_type", grant_type)])
            .json(body);

        let response = self.send(request).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(token.into_session())
    }
}

#[async_trait]
impl SessionProvider for SupabaseBackend {
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<()> {
        let request = self
            .with_key(self.client.post(self.auth_url("signup")))
            .json(credentials);

        self.send(request).await?;
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<AuthSession> {
        self.token_grant("password", credentials).await
    }

    async fn refresh(&self, refresh_token: &str) -> BackendResult<AuthSession> {
        self.token_grant("refresh_token", &RefreshRequest { refresh_token })
            .await
    }

    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()> {
        let request = self.as_user(self.client.post(self.auth_url("logout")), session);

        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl NumberStore for SupabaseBackend {
    async fn list(&self, session: &AuthSession) -> BackendResult<Vec<NumberEntry>> {
        let owner = format!("eq.{}", session.user.id);
        let request = self
            .as_user(self.client.get(self.table_url()), session)
            .query(&[
                ("select", "*"),
                ("user_id", owner.as_str()),
                ("order", "created_at.desc"),
            ]);

        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn insert(&self, session: &AuthSession, entry: NewNumberEntry) -> BackendResult<()> {
        let request = self
            .as_user(self.client.post(self.table_url()), session)
            .header("Prefer", "return=minimal")
            .json(&[entry]);

        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, session: &AuthSession, id: &str) -> BackendResult<()> {
        let filter = format!("eq.{}", id);
        let request = self
            .as_user(self.client.delete(self.table_url()), session)
            .query(&[("id", filter.as_str())]);

        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn health_check(&self) -> BackendResult<()> {
        let request = self.with_key(self.client.get(self.auth_url("health")));

        self.send(request).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the provider's message
async fn api_error(response: Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = provider_message(status, &text);
    let status = status.as_u16();

    if status == 401 {
        BackendError::Unauthorized(message)
    } else {
        BackendError::Api { status, message }
    }
}

/// Extract the human-readable message from a GoTrue or PostgREST error body
///
/// Falls back to the raw body, then to the status text when the body is empty.
fn provider_message(status: StatusCode, body: &str) -> String {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(b) => [b.msg, b.message, b.error_description, b.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
            .unwrap_or_default(),
        Err(_) => body.trim().to_string(),
    };
    if !message.is_empty() {
        return message;
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
            user: self.user,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}
