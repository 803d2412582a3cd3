//! Route composition for the App1 service.

use crate::handlers::{self, AppState};
use crate::middleware::auth::require_bearer;
use crate::middleware::session_relay::relay_session_token;
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use common::policy::AudiencePolicy;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full router. The protected pages sit behind the session
/// relay (outer) and bearer validation (inner); login and demo flows
/// stay public.
pub fn build_routes(state: Arc<AppState>, policy: Arc<AudiencePolicy>) -> Router {
    let protected = Router::new()
        .route("/secure", get(handlers::handle_secure))
        .route("/secure/admin", get(handlers::handle_secure_admin))
        .layer(from_fn_with_state(policy, require_bearer))
        .layer(from_fn_with_state(
            Arc::clone(&state.sessions),
            relay_session_token,
        ));

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/login/user", get(handlers::handle_login_user))
        .route("/login/admin", get(handlers::handle_login_admin))
        .route("/service-test", get(handlers::handle_service_test))
        .merge(protected)
        .route("/health", get(handlers::handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
