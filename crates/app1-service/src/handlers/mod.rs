//! Demo page handlers.
//!
//! The login flows mirror the two demo users the directory ships with:
//! a regular user and an admin. Tokens obtained at login are stored in
//! the server-side session and never returned to the browser.

use crate::config::Config;
use crate::errors::PageError;
use crate::session::{SessionStore, SESSION_COOKIE, TOKEN_KEY};
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use common::policy::AuthenticatedIdentity;
use common::secret::{ExposeSecret, SecretString};
use common::types::{EchoRequest, EchoResponse};
use demo_client::{ApiClient, AuthClient};
use std::sync::Arc;

const USER_EMAIL: &str = "jane.smith@example.com";
const USER_PASSWORD: &str = "SecurePass123!";
const ADMIN_EMAIL: &str = "john.doe@example.com";
const ADMIN_PASSWORD: &str = "Password123!";

/// Shared state for the App1 handlers.
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub auth_client: AuthClient,
    pub api_client: ApiClient,
}

impl AppState {
    /// Build state with clients pointed at the configured services.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Upstream`] if an HTTP client cannot be
    /// constructed.
    pub fn from_config(config: Config) -> Result<Self, PageError> {
        let auth_client = AuthClient::new(config.auth_service_url.clone())?;
        let api_client = ApiClient::new(config.app2_service_url.clone())?;
        Ok(Self {
            config,
            sessions: Arc::new(SessionStore::new()),
            auth_client,
            api_client,
        })
    }
}

pub async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Multi-audience JWT demo",
        "flows": ["/login/user", "/login/admin", "/secure", "/secure/admin", "/service-test"],
    }))
}

/// Log the regular demo user in and start an authenticated session.
pub async fn handle_login_user(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<impl IntoResponse, PageError> {
    login(&state, USER_EMAIL, USER_PASSWORD).await
}

/// Log the admin demo user in and start an authenticated session.
pub async fn handle_login_admin(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<impl IntoResponse, PageError> {
    login(&state, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<impl IntoResponse, PageError> {
    let token = state
        .auth_client
        .login(
            email,
            &SecretString::from(password),
            &state.config.audience,
            false,
        )
        .await?;

    let session_id = state.sessions.create();
    state
        .sessions
        .insert(&session_id, TOKEN_KEY, token.expose_secret().to_string());

    tracing::info!(
        target: "app1.pages",
        audience = %state.config.audience,
        "Login succeeded, session established"
    );

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/secure".to_string()),
            (
                header::SET_COOKIE,
                format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly"),
            ),
        ],
    ))
}

/// Protected page: any authenticated identity.
pub async fn handle_secure(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "This is a secure page",
        "name": identity.claims().name,
        "role": identity.role(),
    }))
}

/// Protected page: role "Admin" only.
pub async fn handle_secure_admin(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<Json<serde_json::Value>, PageError> {
    if !identity.has_role("Admin") {
        tracing::debug!(
            target: "app1.pages",
            role = identity.role(),
            "Admin page refused: insufficient role"
        );
        return Err(PageError::Forbidden);
    }

    Ok(Json(serde_json::json!({
        "message": "This is the admin page",
        "name": identity.claims().name,
    })))
}

/// Service-to-service demo: obtain a token for audience "App2" and call
/// App2's protected echo endpoint with it.
pub async fn handle_service_test(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<Json<EchoResponse>, PageError> {
    let token = state
        .auth_client
        .login(
            USER_EMAIL,
            &SecretString::from(USER_PASSWORD),
            "App2",
            false,
        )
        .await?;

    let response: EchoResponse = state
        .api_client
        .post_json(
            "/api/test/post",
            &EchoRequest {
                data: "Hello World".to_string(),
            },
            &token,
        )
        .await?;

    tracing::info!(target: "app1.pages", "Service-to-service call succeeded");
    Ok(Json(response))
}

/// Liveness probe.
pub async fn handle_health() -> &'static str {
    "OK"
}
