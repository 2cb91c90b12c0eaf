//! Sessions
//!
//! - **state**: `SessionState` and the per-view redirect `gate`
//! - **hub**: server-side registry of signed-in browser sessions
//! - **manager**: sign-up / sign-in / sign-out and per-request resolution

mod hub;
mod manager;
mod state;

pub use hub::{HubConfig, HubError, SessionHub, SessionId};
pub use manager::{ManagerConfig, SessionManager};
pub use state::{gate, Gate, SessionState, View};
