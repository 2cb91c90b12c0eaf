//! Auth page
//!
//! Sign-in and sign-up tabs. Both forms rely on native input constraints
//! only; the sign-up password requires at least six characters.

use maud::{html, Markup};
use serde::Deserialize;

use super::layout::base;
use super::toast::Notification;

/// Minimum password length, enforced by the browser only
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which form is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    SignIn,
    SignUp,
}

/// Query string of `GET /auth`
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub tab: Option<String>,
}

impl AuthQuery {
    pub fn tab(&self) -> Tab {
        match self.tab.as_deref() {
            Some("signup") => Tab::SignUp,
            _ => Tab::SignIn,
        }
    }
}

/// `POST /auth/sign-in` form
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(rename = "signin-email")]
    pub email: String,
    #[serde(rename = "signin-password")]
    pub password: String,
}

/// `POST /auth/sign-up` form
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    #[serde(rename = "signup-email")]
    pub email: String,
    #[serde(rename = "signup-password")]
    pub password: String,
}

/// State the auth view renders from
#[derive(Debug, Default)]
pub struct AuthPage {
    pub tab: Tab,
    /// Email to keep in the sign-in field after a failed attempt
    pub signin_email: String,
    /// Email to keep in the sign-up field after a failed attempt
    pub signup_email: String,
}

impl AuthPage {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            ..Default::default()
        }
    }
}

pub fn render(page: &AuthPage, notifications: &[Notification]) -> Markup {
    base(
        "Welcome - My Number Vault",
        notifications,
        html! {
            div class="page center" {
                div class="card" style="width: 100%; max-width: 28rem" {
                    div style="text-align: center" {
                        h2 { "Welcome" }
                        p class="muted" { "Sign up or sign in to manage your numbers" }
                    }

                    div class="tabs" {
                        a class=(tab_class(page.tab == Tab::SignIn)) href="/auth?tab=signin" { "Sign in" }
                        a class=(tab_class(page.tab == Tab::SignUp)) href="/auth?tab=signup" { "Sign up" }
                    }

                    @match page.tab {
                        Tab::SignIn => { (sign_in_form(&page.signin_email)) },
                        Tab::SignUp => { (sign_up_form(&page.signup_email)) },
                    }
                }
            }
        },
    )
}

fn tab_class(active: bool) -> &'static str {
    if active {
        "tab active"
    } else {
        "tab"
    }
}

fn sign_in_form(email: &str) -> Markup {
    html! {
        form method="post" action="/auth/sign-in" {
            div class="field" {
                label for="signin-email" { "Email" }
                input id="signin-email" name="signin-email" type="email"
                    placeholder="Enter your email" value=(email) required;
            }
            div class="field" {
                label for="signin-password" { "Password" }
                input id="signin-password" name="signin-password" type="password"
                    placeholder="Enter your password" required;
            }
            button class="btn" type="submit" style="width: 100%" data-pending="Signing in..." {
                "Sign in"
            }
        }
    }
}

fn sign_up_form(email: &str) -> Markup {
    html! {
        form method="post" action="/auth/sign-up" {
            div class="field" {
                label for="signup-email" { "Email" }
                input id="signup-email" name="signup-email" type="email"
                    placeholder="Enter your email" value=(email) required;
            }
            div class="field" {
                label for="signup-password" { "Password" }
                input id="signup-password" name="signup-password" type="password"
                    placeholder="Choose a strong password" required
                    minlength=(MIN_PASSWORD_LEN);
            }
            button class="btn" type="submit" style="width: 100%" data-pending="Signing up..." {
                "Sign up"
            }
        }
    }
}
