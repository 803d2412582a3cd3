//! Login endpoint: credentials in, signed token out.

use crate::config::Config;
use crate::errors::AuthServiceError;
use crate::services::{token_service, user_directory::UserDirectory};
use axum::{extract::State, Json};
use common::secret::ExposeSecret;
use common::types::{LoginRequest, TokenResponse};
use std::sync::Arc;

/// Application state shared across handlers.
pub struct AppState {
    pub config: Config,
    pub directory: Arc<dyn UserDirectory>,
}

/// Handle user login and token issuance.
///
/// POST /api/auth/login
///
/// On a credential mismatch the response is a bare unauthorized with no
/// detail about which field was wrong.
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthServiceError> {
    let user = state
        .directory
        .find_by_credentials(&payload.email, payload.password.expose_secret())
        .await?;

    let Some(user) = user else {
        tracing::warn!(
            target: "auth.login",
            audience = %payload.audience,
            "Login rejected: no matching user"
        );
        return Err(AuthServiceError::InvalidCredentials);
    };

    let issued =
        token_service::issue_token(&state.config, &user, &payload.audience, payload.kind())?;

    tracing::info!(
        target: "auth.login",
        audience = %payload.audience,
        kind = ?payload.kind(),
        "Login succeeded, token issued"
    );

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}
