//! Bearer-token authentication for the protected pages.
//!
//! By the time this runs the session relay has already turned a live
//! session into an Authorization header, so browser and direct-bearer
//! requests look the same here.

use crate::errors::PageError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::policy::AudiencePolicy;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Validate the bearer token and attach the identity to the request.
///
/// # Errors
///
/// Returns [`PageError::Unauthorized`] when the header is missing,
/// malformed, or the token fails any policy check.
pub async fn require_bearer(
    State(policy): State<Arc<AudiencePolicy>>,
    mut request: Request,
    next: Next,
) -> Result<Response, PageError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!(
                target: "app1.auth",
                "Request rejected: no usable bearer credential"
            );
            PageError::Unauthorized
        })?;

    let identity = policy.validate(token).map_err(|e| {
        tracing::debug!(
            target: "app1.auth",
            error = %e,
            reason = e.rejection().map_or("other", |r| r.as_str()),
            "Request rejected: token failed validation"
        );
        PageError::Unauthorized
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
