//! Request/response types shared between the issuer, the relying
//! services, and the demo client wrappers.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which lifetime policy an issued token gets.
///
/// The kind affects nothing but the expiry duration; there is no
/// refresh-exchange flow in this demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived credential for direct API access.
    Access,
    /// Longer-lived credential intended to obtain new access tokens.
    Refresh,
}

impl TokenKind {
    /// Wire representation used by the original login contract.
    #[must_use]
    pub fn from_refresh_flag(is_refresh_token: bool) -> Self {
        if is_refresh_token {
            TokenKind::Refresh
        } else {
            TokenKind::Access
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Login key, matched exactly against the user directory.
    pub email: String,
    /// Opaque credential, compared verbatim (not hashed in this design).
    pub password: SecretString,
    /// Relying service the caller wants a token for.
    pub audience: String,
    /// Selects the refresh lifetime instead of the access lifetime.
    #[serde(default)]
    pub is_refresh_token: bool,
}

impl LoginRequest {
    /// Token kind requested by this login.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        TokenKind::from_refresh_flag(self.is_refresh_token)
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("is_refresh_token", &self.is_refresh_token)
            .finish()
    }
}

/// Successful login response: the serialized signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of app2's protected echo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoRequest {
    pub data: String,
}

/// Response of app2's protected echo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoResponse {
    pub message: String,
}
