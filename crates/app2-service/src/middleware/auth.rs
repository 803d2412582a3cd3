//! Bearer-token authentication middleware.
//!
//! Extracts the bearer credential from the Authorization header and
//! validates it against this service's [`AudiencePolicy`]. On success
//! the resulting [`AuthenticatedIdentity`] is inserted into request
//! extensions for handlers to consume. Any failure, including a token
//! minted for a sibling audience, produces the same 401.

use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::policy::{AudiencePolicy, AuthenticatedIdentity};
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Validate the bearer token and attach the identity to the request.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] when the header is missing,
/// malformed, or the token fails any policy check.
pub async fn require_bearer(
    State(policy): State<Arc<AudiencePolicy>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&request).ok_or_else(|| {
        tracing::debug!(
            target: "app2.auth",
            audience = policy.audience(),
            "Request rejected: missing or malformed Authorization header"
        );
        ApiError::Unauthorized
    })?;

    let identity = policy.validate(token).map_err(|e| {
        // The precise reason stays in logs; callers get the generic 401.
        tracing::debug!(
            target: "app2.auth",
            audience = policy.audience(),
            error = %e,
            reason = e.rejection().map_or("other", |r| r.as_str()),
            "Request rejected: token failed validation"
        );
        ApiError::Unauthorized
    })?;

    tracing::debug!(
        target: "app2.auth",
        role = identity.role(),
        "Request authenticated"
    );
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn extract_bearer(request: &Request) -> Option<&str> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?;
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Extension alias handlers use to receive the validated identity.
pub type Identity = axum::Extension<AuthenticatedIdentity>;
