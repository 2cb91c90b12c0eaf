//! HTML views
//!
//! Server-rendered pages built with maud. Views only turn state into markup;
//! fetching and mutating happens in the web handlers.

pub mod auth;
pub mod dashboard;
pub mod landing;
pub mod layout;
pub mod toast;

pub use toast::{Notification, Variant};
