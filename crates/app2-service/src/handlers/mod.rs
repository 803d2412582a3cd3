//! Request handlers for the protected API surface.

use crate::middleware::auth::Identity;
use axum::Json;
use common::types::{EchoRequest, EchoResponse};

/// Protected echo endpoint. Reachable only through the bearer
/// middleware, so the identity extension is always present.
pub async fn handle_test_post(
    axum::Extension(identity): Identity,
    Json(request): Json<EchoRequest>,
) -> Json<EchoResponse> {
    tracing::info!(
        target: "app2.api",
        role = identity.role(),
        "Echo request accepted"
    );

    Json(EchoResponse {
        message: format!("Success {}", request.data),
    })
}

/// Liveness probe, outside the authenticated surface.
pub async fn handle_health() -> &'static str {
    "OK"
}
