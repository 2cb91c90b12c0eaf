//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::Backend;
use crate::session::{HubConfig, ManagerConfig, SessionHub, SessionManager};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Remote table and auth provider
    pub backend: Arc<dyn Backend>,
    /// Browser sessions
    pub sessions: SessionManager,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with default session settings
    pub fn new<B: Backend + 'static>(backend: Arc<B>, config: ServerConfig) -> Self {
        Self::with_sessions(
            backend,
            config,
            HubConfig::default(),
            ManagerConfig::default(),
        )
    }

    /// Create state with explicit session settings
    pub fn with_sessions<B: Backend + 'static>(
        backend: Arc<B>,
        config: ServerConfig,
        hub_config: HubConfig,
        manager_config: ManagerConfig,
    ) -> Self {
        let hub = Arc::new(SessionHub::new(hub_config));
        let sessions = SessionManager::new(backend.clone(), hub, manager_config);

        Self {
            backend,
            sessions,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Web server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Cookie sessions expire after this much inactivity
    pub idle_timeout: Duration,
    /// Only send the session cookie over HTTPS
    pub secure_cookie: bool,
    /// Upper bound on cookie session records kept in memory
    pub session_store_capacity: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
            request_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(60 * 60 * 24 * 7),
            secure_cookie: false,
            session_store_capacity: 100_000,
        }
    }
}

impl ServerConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
