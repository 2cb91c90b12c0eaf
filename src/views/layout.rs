//! Page layout
//!
//! Base HTML document and the loading placeholder.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::toast::{toasts, Notification};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #fafafa; color: #111; }
.page { min-height: 100vh; padding: 1rem; box-sizing: border-box; }
.center { display: flex; align-items: center; justify-content: center; }
.container { max-width: 64rem; margin: 0 auto; }
.card { background: #fff; border: 1px solid #e5e5e5; border-radius: .5rem; padding: 1.25rem; }
.grid { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); }
.muted { color: #666; }
.mono { font-family: ui-monospace, monospace; font-size: 1.25rem; }
.btn { display: inline-block; padding: .5rem 1rem; border-radius: .375rem; border: 1px solid #111; background: #111; color: #fff; text-decoration: none; cursor: pointer; font: inherit; }
.btn-outline { background: #fff; color: #111; }
.btn-ghost { background: none; border-color: transparent; color: #b91c1c; }
.btn[disabled] { opacity: .6; cursor: default; }
.field { display: flex; flex-direction: column; gap: .25rem; margin-bottom: 1rem; }
.field input, .field textarea { padding: .5rem; border: 1px solid #ccc; border-radius: .375rem; font: inherit; }
.tabs { display: grid; grid-template-columns: 1fr 1fr; margin-bottom: 1rem; }
.tab { text-align: center; padding: .5rem; text-decoration: none; color: #666; border-bottom: 2px solid #e5e5e5; }
.tab.active { color: #111; border-color: #111; }
.toasts { position: fixed; bottom: 1rem; right: 1rem; display: flex; flex-direction: column; gap: .5rem; z-index: 50; }
.toast { background: #fff; border: 1px solid #e5e5e5; border-radius: .5rem; padding: .75rem 1rem; box-shadow: 0 4px 12px rgba(0,0,0,.1); max-width: 22rem; }
.toast-destructive { background: #b91c1c; border-color: #b91c1c; color: #fff; }
.toast-title { margin: 0; font-weight: 600; }
.toast-description { margin: .25rem 0 0; }
dialog { border: 1px solid #e5e5e5; border-radius: .5rem; padding: 1.5rem; max-width: 28rem; width: 100%; }
"#;

/// Disables a form's submit button and swaps in its pending label
const PENDING_SCRIPT: &str = r#"
document.addEventListener("submit", function (e) {
  var button = e.target.querySelector("button[data-pending]");
  if (button) { button.disabled = true; button.textContent = button.dataset.pending; }
});
"#;

/// Base HTML document
pub fn base(title: &str, notifications: &[Notification], body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (body)
                (toasts(notifications))
                script { (PreEscaped(PENDING_SCRIPT)) }
            }
        }
    }
}

/// Full-page loading placeholder
///
/// Reloads itself so the view re-checks the session once it has settled.
pub fn loading() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content="1";
                title { "Loading..." }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="page center" {
                    h2 { "Loading..." }
                }
            }
        }
    }
}

/// Plain error page for failures of the web layer itself
pub fn error_page(message: &str) -> Markup {
    base(
        "Something went wrong",
        &[],
        html! {
            div class="page center" {
                div class="card" {
                    h2 { "Something went wrong" }
                    p class="muted" { (message) }
                    a class="btn" href="/" { "Back to start" }
                }
            }
        },
    )
}
