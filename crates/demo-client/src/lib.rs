//! Thin HTTP client wrappers for the demo flows.
//!
//! [`AuthClient`] obtains a token from the issuer's login endpoint;
//! [`ApiClient`] replays it as a bearer credential against a relying
//! service. Neither does any token inspection — they are transport
//! glue around the core.
//!
//! # Security
//!
//! - The obtained token is held as `SecretString` (never logged)
//! - Request timeouts prevent hanging connections

#![warn(clippy::pedantic)]

use common::secret::{ExposeSecret, SecretString};
use common::types::TokenResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP request timeout.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the demo client wrappers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("HTTP client error: {0}")]
    Http(String),

    /// The remote service answered with a non-success status.
    #[error("Request rejected with status {0}")]
    Rejected(u16),

    /// The response body was not the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn build_http_client() -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .map_err(|e| ClientError::Http(e.to_string()))
}

/// Client for the issuer's login endpoint.
pub struct AuthClient {
    base_url: String,
    client: reqwest::Client,
}

impl AuthClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_http_client()?,
        })
    }

    /// Log in and return the issued token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] on any non-success status
    /// (including bad credentials) and [`ClientError::InvalidResponse`]
    /// if the body lacks a token.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        audience: &str,
        is_refresh_token: bool,
    ) -> Result<SecretString, ClientError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
            "audience": audience,
            "is_refresh_token": is_refresh_token,
        });

        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                target: "demo.client",
                status = status.as_u16(),
                audience = audience,
                "Login rejected"
            );
            return Err(ClientError::Rejected(status.as_u16()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if token.token.is_empty() {
            return Err(ClientError::InvalidResponse(
                "login response carried an empty token".to_string(),
            ));
        }

        Ok(SecretString::from(token.token))
    }
}

/// Client for a relying service's protected endpoints.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_http_client()?,
        })
    }

    /// POST a JSON body with the token as bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] on non-success status and
    /// [`ClientError::InvalidResponse`] on an undecodable body.
    pub async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
        token: &SecretString,
    ) -> Result<R, ClientError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                target: "demo.client",
                status = status.as_u16(),
                endpoint = endpoint,
                "Request rejected"
            );
            return Err(ClientError::Rejected(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
