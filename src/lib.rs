//! # Number Vault
//!
//! A small server-rendered web app for keeping personal numbers (phone
//! numbers, account numbers, codes) behind an account. Authentication and
//! storage are delegated to a backend-as-a-service.
//!
//! ## Modules
//!
//! - [`backend`]: Auth provider and `numbers` table (Supabase or in-memory)
//! - [`session`]: Server-side sessions, token refresh and view gating
//! - [`views`]: HTML pages rendered with maud
//! - [`web`]: Axum router, handlers and server
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use numvault::backend::MemoryBackend;
//! use numvault::web::{serve, AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::new("127.0.0.1", 8085));
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod session;
pub mod views;
pub mod web;

// Re-export top-level types for convenience
pub use backend::{
    AuthSession, Backend, BackendError, BackendResult, Credentials, MemoryBackend,
    NewNumberEntry, NumberEntry, NumberStore, SessionProvider, SupabaseBackend, SupabaseConfig,
    User,
};

pub use session::{Gate, SessionHub, SessionManager, SessionState, View};

pub use web::{build_router, serve, AppState, ServerConfig, WebError};

pub use config::{BackendKind, Config, ConfigError, LoggingConfig};
