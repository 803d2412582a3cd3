//! HTTP error mapping for the issuer.
//!
//! Credential mismatches and directory failures both collapse into
//! bodies that reveal nothing about which part failed.

use crate::services::user_directory::DirectoryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::AuthError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// No user matched the presented email + password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed issuance request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The user directory collaborator failed.
    #[error("User directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Token issuance failed for a non-input reason.
    #[error("Token issuance failed")]
    Issuance,
}

impl From<AuthError> for AuthServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => AuthServiceError::InvalidRequest(msg),
            AuthError::Configuration(_) | AuthError::Rejected(_) => AuthServiceError::Issuance,
        }
    }
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

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthServiceError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            AuthServiceError::InvalidRequest(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", reason.clone())
            }
            AuthServiceError::Directory(_) | AuthServiceError::Issuance => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_maps_to_401() {
        let response = AuthServiceError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn invalid_request_maps_to_400() {
        let response =
            AuthServiceError::InvalidRequest("audience must not be empty".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn directory_failure_maps_to_500() {
        let response =
            AuthServiceError::Directory(DirectoryError::Fetch("timeout".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_error_input_becomes_bad_request() {
        let err: AuthServiceError =
            AuthError::InvalidInput("bad audience".to_string()).into();
        assert!(matches!(err, AuthServiceError::InvalidRequest(_)));
    }

    #[test]
    fn auth_error_configuration_becomes_internal() {
        let err: AuthServiceError = AuthError::Configuration("empty key".to_string()).into();
        assert!(matches!(err, AuthServiceError::Issuance));
    }
}
