//! Route composition for the App2 service.

use crate::handlers;
use crate::middleware::auth::require_bearer;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use common::policy::AudiencePolicy;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full router. Everything under /api sits behind the bearer
/// middleware; the health probe does not.
pub fn build_routes(policy: Arc<AudiencePolicy>) -> Router {
    let protected = Router::new()
        .route("/api/test/post", post(handlers::handle_test_post))
        .layer(from_fn_with_state(Arc::clone(&policy), require_bearer));

    Router::new()
        .merge(protected)
        .route("/health", get(handlers::handle_health))
        .layer(TraceLayer::new_for_http())
}
