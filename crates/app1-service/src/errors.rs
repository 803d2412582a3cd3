//! HTTP error mapping for the App1 pages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use demo_client::ClientError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    /// Missing, unparseable, or rejected bearer credential.
    #[error("The access token is invalid or expired")]
    Unauthorized,

    /// Authenticated but lacking the required role.
    #[error("Insufficient permissions")]
    Forbidden,

    /// The issuer or a sibling service could not satisfy a demo flow.
    #[error("Upstream service error: {0}")]
    Upstream(#[from] ClientError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            PageError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            PageError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            PageError::Upstream(e) => {
                tracing::warn!(target: "app1.pages", error = %e, "Upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An upstream service is unavailable".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
