//! Dashboard page
//!
//! The signed-in user's numbers, the add-number dialog and sign-out.

use maud::{html, Markup};
use serde::Deserialize;

use super::layout::base;
use super::toast::Notification;
use crate::backend::NumberEntry;

/// Query string of `GET /dashboard`
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// `?add=1` opens the add dialog
    #[serde(default)]
    pub add: Option<String>,
}

impl DashboardQuery {
    pub fn dialog_open(&self) -> bool {
        self.add.is_some()
    }
}

/// `POST /dashboard/numbers` form
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AddEntryForm {
    pub title: String,
    pub number_value: String,
    #[serde(default)]
    pub description: String,
}

impl AddEntryForm {
    /// The description, if one was entered
    pub fn description(&self) -> Option<String> {
        if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.clone())
        }
    }
}

/// State the dashboard renders from
#[derive(Debug, Default)]
pub struct DashboardPage {
    /// Replaced wholesale on every fetch
    pub entries: Vec<NumberEntry>,
    pub dialog_open: bool,
    /// Values to keep in the add form after a failed save
    pub draft: AddEntryForm,
    pub email: Option<String>,
}

pub fn render(page: &DashboardPage, notifications: &[Notification]) -> Markup {
    base(
        "My Numbers",
        notifications,
        html! {
            div class="page" {
                div class="container" {
                    div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 2rem" {
                        div {
                            h1 style="margin: 0" { "My Numbers" }
                            p class="muted" {
                                "Manage your collection of numbers"
                                @if let Some(email) = &page.email {
                                    " · " (email)
                                }
                            }
                        }
                        div style="display: flex; gap: .5rem" {
                            a class="btn" href="/dashboard?add=1" { "+ Add number" }
                            form method="post" action="/sign-out" {
                                button class="btn btn-outline" type="submit" { "Sign out" }
                            }
                        }
                    }

                    @if page.entries.is_empty() {
                        (empty_state())
                    } @else {
                        div class="grid" {
                            @for entry in &page.entries {
                                (entry_card(entry))
                            }
                        }
                    }
                }
            }

            (add_dialog(page.dialog_open, &page.draft))
        },
    )
}

fn empty_state() -> Markup {
    html! {
        div class="card center" style="flex-direction: column; padding: 4rem 1rem" {
            h3 { "No saved numbers" }
            p class="muted" { "Start adding numbers to your collection" }
            a class="btn" href="/dashboard?add=1" { "+ Add your first number" }
        }
    }
}

fn entry_card(entry: &NumberEntry) -> Markup {
    html! {
        div class="card" data-entry-id=(entry.id) {
            div style="display: flex; justify-content: space-between; align-items: flex-start" {
                div {
                    h3 style="margin: 0" { (entry.title) }
                    p class="mono" { (entry.number_value) }
                }
                form method="post" action={ "/dashboard/numbers/" (entry.id) "/delete" } {
                    button class="btn btn-ghost" type="submit" title="Delete" { "Delete" }
                }
            }
            @if let Some(description) = &entry.description {
                p class="muted description" { (description) }
            }
        }
    }
}

fn add_dialog(open: bool, draft: &AddEntryForm) -> Markup {
    html! {
        dialog id="add-dialog" open[open] {
            h2 { "Add a new number" }
            p class="muted" { "Add a new number to your collection with a description" }
            form method="post" action="/dashboard/numbers" {
                div class="field" {
                    label for="title" { "Title" }
                    input id="title" name="title" placeholder="e.g. Dani's phone"
                        value=(draft.title) required;
                }
                div class="field" {
                    label for="number_value" { "Number" }
                    input id="number_value" name="number_value" placeholder="050-123-4567"
                        value=(draft.number_value) required;
                }
                div class="field" {
                    label for="description" { "Description (optional)" }
                    textarea id="description" name="description"
                        placeholder="Add more details about this number..." {
                        (draft.description)
                    }
                }
                div style="display: flex; gap: .5rem" {
                    button class="btn" type="submit" style="flex: 1" data-pending="Saving..." {
                        "Save number"
                    }
                    a class="btn btn-outline" href="/dashboard" { "Cancel" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: &str, title: &str, description: Option<&str>) -> NumberEntry {
        NumberEntry {
            id: id.into(),
            user_id: "u1".into(),
            title: title.into(),
            number_value: "050-123-4567".into(),
            description: description.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_list_shows_placeholder() {
        let html = render(&DashboardPage::default(), &[]).into_string();

        assert!(html.contains("No saved numbers"));
        assert!(html.contains("+ Add your first number"));
        assert!(!html.contains("data-entry-id"));
    }

    #[test]
    fn test_one_card_per_entry() {
        let page = DashboardPage {
            entries: vec![
                entry("a", "Dani's phone", None),
                entry("b", "Office", Some("ext. 12")),
            ],
            ..Default::default()
        };
        let html = render(&page, &[]).into_string();

        assert_eq!(html.matches("data-entry-id").count(), 2);
        assert!(html.contains("Dani&#39;s phone") || html.contains("Dani's phone"));
        assert!(html.contains("050-123-4567"));
        assert!(html.contains("ext. 12"));
        assert_eq!(html.matches("muted description").count(), 1);
        assert!(html.contains(r#"action="/dashboard/numbers/a/delete""#));
        assert!(!html.contains("No saved numbers"));
    }

    #[test]
    fn test_dialog_keeps_draft_when_open() {
        let page = DashboardPage {
            dialog_open: true,
            draft: AddEntryForm {
                title: "Dani's phone".into(),
                number_value: "050-123-4567".into(),
                description: "mobile".into(),
            },
            ..Default::default()
        };
        let html = render(&page, &[]).into_string();

        assert!(html.contains(r#"<dialog id="add-dialog" open>"#));
        assert!(html.contains(r#"value="050-123-4567""#));
        assert!(html.contains(">mobile</textarea>"));
    }

    #[test]
    fn test_dialog_closed_by_default() {
        let html = render(&DashboardPage::default(), &[]).into_string();
        assert!(html.contains(r#"<dialog id="add-dialog">"#));
    }

    #[test]
    fn test_form_description_is_optional() {
        let form = AddEntryForm {
            title: "t".into(),
            number_value: "1".into(),
            description: "   ".into(),
        };
        assert_eq!(form.description(), None);
    }
}
