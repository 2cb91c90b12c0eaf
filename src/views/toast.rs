//! Toast notifications
//!
//! Shows success and error messages.

use maud::{html, Markup};
use serde::{Deserialize, Serialize};

/// Visual style of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

/// A notification shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub variant: Variant,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: Variant::Default,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notification; `description` is the provider's message verbatim
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: Variant::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Toast notification container
pub fn toasts(notifications: &[Notification]) -> Markup {
    html! {
        @if !notifications.is_empty() {
            div class="toasts" role="status" aria-live="polite" {
                @for n in notifications {
                    (toast(n))
                }
            }
        }
    }
}

fn toast(notification: &Notification) -> Markup {
    let class = if notification.is_destructive() {
        "toast toast-destructive"
    } else {
        "toast"
    };

    html! {
        div class=(class) {
            p class="toast-title" { (notification.title) }
            @if !notification.description.is_empty() {
                p class="toast-description" { (notification.description) }
            }
        }
    }
}
