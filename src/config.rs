//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::SupabaseConfig;
use crate::session::{HubConfig, ManagerConfig};
use crate::web::ServerConfig as WebServerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Which backend serves auth and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Supabase,
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// Supabase project URL
    #[serde(default)]
    pub url: String,

    /// Supabase anon key
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_backend_timeout")]
    pub request_timeout_ms: u64,
}

fn default_table() -> String {
    "numbers".to_string()
}

fn default_backend_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            request_timeout_ms: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn supabase(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.url.clone(),
            anon_key: self.anon_key.clone(),
            table: self.table.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_ms: u64,

    #[serde(default = "default_refresh_leeway")]
    pub refresh_leeway_secs: u64,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_max_sessions_per_user")]
    pub max_sessions_per_user: usize,

    /// Upper bound on cookie session records kept in memory
    #[serde(default = "default_store_capacity")]
    pub store_capacity: u64,

    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_idle_timeout() -> u64 {
    60 * 60 * 24 * 7 // 7 days
}

fn default_resolve_timeout() -> u64 {
    1500
}

fn default_refresh_leeway() -> u64 {
    60
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_max_sessions_per_user() -> usize {
    10
}

fn default_store_capacity() -> u64 {
    100_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            resolve_timeout_ms: default_resolve_timeout(),
            refresh_leeway_secs: default_refresh_leeway(),
            max_sessions: default_max_sessions(),
            max_sessions_per_user: default_max_sessions_per_user(),
            store_capacity: default_store_capacity(),
            secure_cookie: false,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn hub(&self) -> HubConfig {
        HubConfig {
            max_sessions: self.max_sessions,
            max_sessions_per_user: self.max_sessions_per_user,
        }
    }

    pub fn manager(&self) -> ManagerConfig {
        ManagerConfig {
            resolve_timeout: Duration::from_millis(self.resolve_timeout_ms),
            refresh_leeway: Duration::from_secs(self.refresh_leeway_secs),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("numvault").join("config.toml")),
            Some(PathBuf::from("/etc/numvault/config.toml")),
            Some(PathBuf::from("./numvault.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check the settings the chosen backend needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Supabase {
            if self.backend.url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "backend.url (or SUPABASE_URL) is required for the supabase backend".into(),
                ));
            }
            if self.backend.anon_key.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "backend.anon_key (or SUPABASE_ANON_KEY) is required for the supabase backend"
                        .into(),
                ));
            }
        }

        Ok(())
    }

    /// Settings for the web layer
    pub fn web(&self) -> WebServerConfig {
        WebServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            idle_timeout: self.session.idle_timeout(),
            secure_cookie: self.session.secure_cookie,
            session_store_capacity: self.session.store_capacity,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(host) = std::env::var("NUMVAULT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NUMVAULT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Backend overrides
        if let Ok(kind) = std::env::var("NUMVAULT_BACKEND") {
            match kind.parse() {
                Ok(k) => self.backend.kind = k,
                Err(e) => tracing::warn!("Ignoring NUMVAULT_BACKEND: {}", e),
            }
        }
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            self.backend.url = url;
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            self.backend.anon_key = key;
        }
        if let Ok(table) = std::env::var("NUMVAULT_TABLE") {
            self.backend.table = table;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("NUMVAULT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("NUMVAULT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Number Vault Configuration
#
# Environment variables override these settings:
# - NUMVAULT_HOST
# - NUMVAULT_PORT
# - NUMVAULT_BACKEND
# - SUPABASE_URL
# - SUPABASE_ANON_KEY
# - NUMVAULT_TABLE
# - NUMVAULT_LOG_LEVEL
# - NUMVAULT_LOG_FORMAT

[server]
# Host to bind to
host = "0.0.0.0"

# Port to listen on
port = 8085

# Request timeout in seconds
request_timeout_secs = 30

[backend]
# Backend: supabase, or memory for local development
kind = "supabase"

# Supabase project URL and public anon key
url = "https://your-project.supabase.co"
anon_key = ""

# Table holding the number entries
table = "numbers"

# Backend request timeout (ms)
request_timeout_ms = 10000

[session]
# Sign users out after this much inactivity (seconds)
idle_timeout_secs = 604800

# How long a page waits for a token refresh before showing "Loading..." (ms)
resolve_timeout_ms = 1500

# Refresh access tokens this long before they expire (seconds)
refresh_leeway_secs = 60

# Maximum number of signed-in sessions; the least recently seen is
# signed out when a new one does not fit
max_sessions = 10000

# Maximum number of signed-in sessions per user
max_sessions_per_user = 10

# Maximum number of cookie session records kept in memory
store_capacity = 100000

# Only send the session cookie over HTTPS
secure_cookie = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
