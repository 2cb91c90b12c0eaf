//! Number Vault web server
//!
//! Server-rendered pages built with Axum and maud. Every mutation answers
//! with a `303` back to a page, which renders the outcome.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /` - Landing page
//! - `GET /auth` - Sign in / sign up (`?tab=signup`)
//! - `GET /dashboard` - Saved numbers (`?add=1` opens the add dialog)
//!
//! ## Forms
//! - `POST /auth/sign-in` - Sign in
//! - `POST /auth/sign-up` - Register
//! - `POST /sign-out` - Sign out
//! - `POST /dashboard/numbers` - Add a number
//! - `POST /dashboard/numbers/:id/delete` - Delete a number
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use numvault::backend::MemoryBackend;
//! use numvault::web::{serve, AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::default());
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod cookie_session;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::{AppState, ServerConfig};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

/// How often idle server-side sessions are swept
const PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let idle = time::Duration::try_from(state.config.idle_timeout).unwrap_or(time::Duration::WEEK);
    // Moka drops records once they expire and caps how many are kept.
    let store = MokaStore::new(Some(state.config.session_store_capacity));
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(state.config.secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(idle));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let request_timeout = state.config.request_timeout;
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::landing::landing))
        .route("/auth", get(routes::auth::auth_page))
        .route("/auth/sign-in", post(routes::auth::sign_in))
        .route("/auth/sign-up", post(routes::auth::sign_up))
        .route("/sign-out", post(routes::auth::sign_out))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route("/dashboard/numbers", post(routes::dashboard::add_entry))
        .route(
            "/dashboard/numbers/:id/delete",
            post(routes::dashboard::delete_entry),
        )
        .nest("/health", health_routes)
        .layer(session_layer)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the web server
pub async fn serve(state: AppState) -> Result<(), WebError> {
    let addr = state.config.addr();
    let pruner = state
        .sessions
        .hub()
        .clone()
        .start_pruning(PRUNE_INTERVAL, state.config.idle_timeout);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Number Vault listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    pruner.abort();
    result.map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Number Vault shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{Call, Op, RecordingBackend};
    use crate::backend::{Credentials, MemoryBackend, NewNumberEntry, NumberStore, SessionProvider};
    use crate::session::{HubConfig, ManagerConfig};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    const EMAIL: &str = "dani@example.com";
    const PASSWORD: &str = "secret123";

    /// Router plus a browser-like cookie jar of one cookie
    struct TestApp {
        router: Router,
        backend: Arc<RecordingBackend>,
        cookie: Option<String>,
    }

    impl TestApp {
        async fn new() -> Self {
            Self::build(MemoryBackend::new(), HubConfig::default(), ManagerConfig::default()).await
        }

        async fn build(inner: MemoryBackend, hub: HubConfig, manager: ManagerConfig) -> Self {
            let backend = Arc::new(RecordingBackend::wrapping(inner));
            backend
                .inner()
                .sign_up(&Credentials::new(EMAIL, PASSWORD))
                .await
                .unwrap();

            let state = AppState::with_sessions(
                backend.clone(),
                ServerConfig::default(),
                hub,
                manager,
            );
            Self {
                router: build_router(state),
                backend,
                cookie: None,
            }
        }

        async fn send(&mut self, request: axum::http::request::Builder, body: Body) -> Response {
            let request = match &self.cookie {
                Some(cookie) => request.header(header::COOKIE, cookie),
                None => request,
            };
            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();

            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = if pair.ends_with('=') {
                    None
                } else {
                    Some(pair.to_string())
                };
            }
            response
        }

        async fn get(&mut self, uri: &str) -> Response {
            self.send(Request::builder().uri(uri), Body::empty()).await
        }

        async fn post(&mut self, uri: &str, form: &str) -> Response {
            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
                Body::from(form.to_string()),
            )
            .await
        }

        async fn sign_in(&mut self) {
            let response = self
                .post(
                    "/auth/sign-in",
                    "signin-email=dani%40example.com&signin-password=secret123",
                )
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/dashboard");
        }

        async fn user_id(&self) -> String {
            self.backend
                .inner()
                .sign_in(&Credentials::new(EMAIL, PASSWORD))
                .await
                .unwrap()
                .user
                .id
        }
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let mut app = TestApp::new().await;
        let response = app.get("/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let mut app = TestApp::new().await;
        app.sign_in().await;

        let response = app.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let health: routes::health::HealthResponse =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.backend, "ok");
        assert_eq!(health.sessions, 1);
    }

    #[tokio::test]
    async fn test_signed_out_sees_public_pages() {
        let mut app = TestApp::new().await;

        let landing = app.get("/").await;
        assert_eq!(landing.status(), StatusCode::OK);
        assert!(body_text(landing).await.contains("My Number Vault"));

        let auth = app.get("/auth?tab=signup").await;
        assert_eq!(auth.status(), StatusCode::OK);
        assert!(body_text(auth).await.contains("/auth/sign-up"));
    }

    #[tokio::test]
    async fn test_signed_out_dashboard_redirects_home() {
        let mut app = TestApp::new().await;

        let response = app.get("/dashboard").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(app.backend.count(|c| matches!(c, Call::List(_))), 0);
    }

    #[tokio::test]
    async fn test_signed_in_skips_public_pages() {
        let mut app = TestApp::new().await;
        app.sign_in().await;

        for uri in ["/", "/auth"] {
            let response = app.get(uri).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/dashboard");
        }
    }

    #[tokio::test]
    async fn test_expiring_session_shows_loading() {
        // Tokens are handed out already expired.
        let inner = MemoryBackend::with_token_ttl(chrono::Duration::seconds(-1));
        let manager = ManagerConfig {
            resolve_timeout: Duration::ZERO,
            refresh_leeway: Duration::from_secs(60),
        };
        let mut app = TestApp::build(inner, HubConfig::default(), manager).await;
        app.sign_in().await;

        let response = app.get("/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Loading..."));
        assert_eq!(app.backend.count(|c| matches!(c, Call::List(_))), 0);
    }

    #[tokio::test]
    async fn test_sign_in_shows_welcome_once() {
        let mut app = TestApp::new().await;
        app.sign_in().await;

        let html = body_text(app.get("/dashboard").await).await;
        assert!(html.contains("Signed in successfully!"));
        assert!(html.contains("No saved numbers"));

        let html = body_text(app.get("/dashboard").await).await;
        assert!(!html.contains("Signed in successfully!"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_stays_on_auth() {
        let mut app = TestApp::new().await;

        let response = app
            .post(
                "/auth/sign-in",
                "signin-email=dani%40example.com&signin-password=wrong-password",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth");

        let html = body_text(app.get("/auth").await).await;
        assert!(html.contains("Sign-in failed"));
        assert!(html.contains("Invalid login credentials"));
        assert!(html.contains(r#"value="dani@example.com""#));

        // Reloading shows a clean form.
        let html = body_text(app.get("/auth").await).await;
        assert!(!html.contains("Sign-in failed"));
        assert!(!html.contains(r#"value="dani@example.com""#));

        let response = app.get("/dashboard").await;
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_sign_up_does_not_sign_in() {
        let mut app = TestApp::new().await;

        let response = app
            .post(
                "/auth/sign-up",
                "signup-email=noa%40example.com&signup-password=another1",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth");
        assert_eq!(app.backend.count(|c| matches!(c, Call::SignIn(_))), 0);

        let html = body_text(app.get("/auth").await).await;
        assert!(html.contains("Signed up successfully!"));
        assert!(html.contains("/auth/sign-in"));

        let response = app.get("/dashboard").await;
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_sign_up_failure_shows_provider_message() {
        let mut app = TestApp::new().await;

        let response = app
            .post(
                "/auth/sign-up",
                "signup-email=noa%40example.com&signup-password=abc",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth?tab=signup");

        let html = body_text(app.get("/auth?tab=signup").await).await;
        assert!(html.contains("Sign-up failed"));
        assert!(html.contains("Password should be at least 6 characters."));
        assert!(html.contains(r#"value="noa@example.com""#));
    }

    #[tokio::test]
    async fn test_abandoned_sign_ins_do_not_lock_out_others() {
        let hub = HubConfig {
            max_sessions: 3,
            max_sessions_per_user: 2,
        };
        let mut app = TestApp::build(MemoryBackend::new(), hub, ManagerConfig::default()).await;
        app.backend
            .inner()
            .sign_up(&Credentials::new("noa@example.com", "another1"))
            .await
            .unwrap();

        // One account signing in repeatedly and dropping the cookie each time.
        for _ in 0..4 {
            app.sign_in().await;
            app.cookie = None;
        }

        let response = app
            .post(
                "/auth/sign-in",
                "signin-email=noa%40example.com&signin-password=another1",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");

        let response = app.get("/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("noa@example.com"));

        let health: routes::health::HealthResponse =
            serde_json::from_str(&body_text(app.get("/health").await).await).unwrap();
        assert_eq!(health.sessions, 3);
    }

    #[tokio::test]
    async fn test_anonymous_sign_out_stores_nothing() {
        let mut app = TestApp::new().await;

        let response = app.post("/sign-out", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(app.backend.count(|c| matches!(c, Call::SignOut(_))), 0);
    }

    #[tokio::test]
    async fn test_add_entry_inserts_once_then_refetches() {
        let mut app = TestApp::new().await;
        app.sign_in().await;
        let user_id = app.user_id().await;
        app.backend.clear_calls();

        let response = app
            .post(
                "/dashboard/numbers",
                "title=Dani%27s+phone&number_value=050-123-4567&description=",
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        assert_eq!(
            app.backend.calls(),
            vec![Call::Insert(NewNumberEntry::new(
                user_id.as_str(),
                "Dani's phone",
                "050-123-4567",
                None
            ))]
        );

        let response = app.get("/dashboard").await;
        let html = body_text(response).await;
        assert_eq!(app.backend.count(|c| matches!(c, Call::List(_))), 1);
        assert!(html.contains("Number saved!"));
        assert!(html.contains("050-123-4567"));
        assert!(html.contains(r#"<dialog id="add-dialog">"#));
        assert_eq!(html.matches("data-entry-id").count(), 1);
    }

    #[tokio::test]
    async fn test_add_entry_failure_keeps_dialog_open() {
        let mut app = TestApp::new().await;
        app.sign_in().await;
        app.backend.fail(Op::Insert, "new row violates row-level security policy");

        let response = app
            .post(
                "/dashboard/numbers",
                "title=Office&number_value=03-555-0000&description=ext.+12",
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Failed to save number"));
        assert!(html.contains("new row violates row-level security policy"));
        assert!(html.contains(r#"<dialog id="add-dialog" open>"#));
        assert!(html.contains(r#"value="03-555-0000""#));
        assert!(html.contains(">ext. 12</textarea>"));
        assert_eq!(app.backend.inner().row_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_entry_then_refetch() {
        let mut app = TestApp::new().await;
        app.sign_in().await;

        let auth = app
            .backend
            .inner()
            .sign_in(&Credentials::new(EMAIL, PASSWORD))
            .await
            .unwrap();
        app.backend
            .inner()
            .insert(
                &auth,
                NewNumberEntry::new(auth.user.id.as_str(), "Office", "03-555-0000", None),
            )
            .await
            .unwrap();
        let entry_id = app.backend.inner().list(&auth).await.unwrap()[0].id.clone();
        app.backend.clear_calls();

        let response = app
            .post(&format!("/dashboard/numbers/{}/delete", entry_id), "")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.backend.calls(), vec![Call::Delete(entry_id)]);

        let html = body_text(app.get("/dashboard").await).await;
        assert_eq!(app.backend.count(|c| matches!(c, Call::List(_))), 1);
        assert!(html.contains("Number deleted"));
        assert!(html.contains("No saved numbers"));
    }

    #[tokio::test]
    async fn test_delete_failure_still_refetches() {
        let mut app = TestApp::new().await;
        app.sign_in().await;
        app.backend.fail(Op::Delete, "permission denied");
        app.backend.clear_calls();

        let response = app.post("/dashboard/numbers/missing/delete", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");

        let html = body_text(app.get("/dashboard").await).await;
        assert_eq!(app.backend.count(|c| matches!(c, Call::Delete(_))), 1);
        assert_eq!(app.backend.count(|c| matches!(c, Call::List(_))), 1);
        assert!(html.contains("Failed to delete number"));
        assert!(html.contains("permission denied"));
    }

    #[tokio::test]
    async fn test_list_failure_shows_notification() {
        let mut app = TestApp::new().await;
        app.sign_in().await;
        app.backend.fail(Op::List, "relation \"numbers\" does not exist");

        let response = app.get("/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Failed to load numbers"));
        assert!(html.contains("No saved numbers"));
    }

    #[tokio::test]
    async fn test_mutations_require_session() {
        let mut app = TestApp::new().await;

        let response = app
            .post("/dashboard/numbers", "title=a&number_value=1&description=")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(app.backend.count(|c| matches!(c, Call::Insert(_))), 0);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_landing() {
        let mut app = TestApp::new().await;
        app.sign_in().await;

        let response = app.post("/sign-out", "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(app.backend.count(|c| matches!(c, Call::SignOut(_))), 1);

        let html = body_text(app.get("/").await).await;
        assert!(html.contains("Signed out"));

        let response = app.get("/dashboard").await;
        assert_eq!(location(&response), "/");
    }
}
