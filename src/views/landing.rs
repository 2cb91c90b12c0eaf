//! Landing page
//!
//! Public entry point with two calls to action leading to the auth view.

use maud::{html, Markup};

use super::layout::base;
use super::toast::Notification;

pub fn render(notifications: &[Notification]) -> Markup {
    base(
        "My Number Vault",
        notifications,
        html! {
            div class="page center" {
                div class="container" style="text-align: center" {
                    div {
                        div style="font-size: 4rem" { "#" }
                        h1 style="font-size: 3rem; margin: 0 0 1rem" { "My Number Vault" }
                        p class="muted" style="font-size: 1.25rem; margin-bottom: 2rem" {
                            "Keep all your important numbers in one secure place"
                        }
                    }

                    div class="grid" style="margin-bottom: 3rem" {
                        (feature_card("Secure", "Your numbers are stored safely in the cloud"))
                        (feature_card("Organized", "Give every number a title and a description"))
                        (feature_card("Private", "Only you can see your numbers"))
                    }

                    div style="display: flex; gap: 1rem; justify-content: center" {
                        a class="btn" href="/auth?tab=signup" { "Get started" }
                        a class="btn btn-outline" href="/auth" { "I have an account" }
                    }
                }
            }
        },
    )
}

fn feature_card(title: &str, description: &str) -> Markup {
    html! {
        div class="card" {
            h3 { (title) }
            p class="muted" { (description) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_to_action_lead_to_auth() {
        let html = render(&[]).into_string();
        assert!(html.contains("My Number Vault"));
        assert!(html.contains(r#"href="/auth?tab=signup">Get started</a>"#));
        assert!(html.contains(r#"href="/auth">I have an account</a>"#));
    }
}
