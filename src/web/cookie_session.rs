//! Cookie session helpers
//!
//! The browser's cookie session holds two things: the id of its server-side
//! session in the hub, and notifications waiting for the next rendered page.

use tower_sessions::Session;

use super::error::WebResult;
use crate::session::SessionId;
use crate::views::auth::Tab;
use crate::views::Notification;

/// Key for the hub session id
pub const SESSION_ID_KEY: &str = "sid";

/// Key for pending notifications
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Keys for the email to put back into an auth form after a redirect
pub const SIGNIN_EMAIL_KEY: &str = "signin_email";
pub const SIGNUP_EMAIL_KEY: &str = "signup_email";

fn email_key(tab: Tab) -> &'static str {
    match tab {
        Tab::SignIn => SIGNIN_EMAIL_KEY,
        Tab::SignUp => SIGNUP_EMAIL_KEY,
    }
}

pub async fn session_id(session: &Session) -> WebResult<Option<SessionId>> {
    Ok(session.get::<SessionId>(SESSION_ID_KEY).await?)
}

/// Remember a new hub session, rotating the cookie id first
pub async fn set_session_id(session: &Session, id: &SessionId) -> WebResult<()> {
    session.cycle_id().await?;
    session.insert(SESSION_ID_KEY, id).await?;
    Ok(())
}

pub async fn clear_session_id(session: &Session) -> WebResult<()> {
    session.remove::<SessionId>(SESSION_ID_KEY).await?;
    Ok(())
}

/// Queue a notification for the next rendered page
pub async fn push_notification(session: &Session, notification: Notification) -> WebResult<()> {
    let mut pending: Vec<Notification> = session
        .get(NOTIFICATIONS_KEY)
        .await?
        .unwrap_or_default();
    pending.push(notification);
    session.insert(NOTIFICATIONS_KEY, pending).await?;
    Ok(())
}

/// Take all pending notifications
pub async fn take_notifications(session: &Session) -> WebResult<Vec<Notification>> {
    Ok(session
        .remove::<Vec<Notification>>(NOTIFICATIONS_KEY)
        .await?
        .unwrap_or_default())
}

/// Keep an email for the next render of the auth form on `tab`
pub async fn keep_email(session: &Session, tab: Tab, email: &str) -> WebResult<()> {
    session.insert(email_key(tab), email).await?;
    Ok(())
}

/// Take the kept email for the auth form on `tab`
pub async fn take_email(session: &Session, tab: Tab) -> WebResult<Option<String>> {
    Ok(session.remove::<String>(email_key(tab)).await?)
}
