//! Error types shared across the demo services.
//!
//! Token rejections carry a precise [`RejectionReason`] for internal
//! logging, but every rejection renders the same generic message so the
//! caller cannot distinguish a bad signature from a wrong audience.

use thiserror::Error;

/// Category of token rejection, for internal logging only.
///
/// Never serialize this into a client-facing response body; the uniform
/// `Display` of [`AuthError::Rejected`] exists to prevent oracle attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Signature did not verify under the policy key, or the token
    /// declared an algorithm the policy does not accept.
    BadSignature,
    /// The `iss` claim does not match the policy issuer.
    WrongIssuer,
    /// The `aud` claim does not match the policy audience.
    WrongAudience,
    /// The current time is outside the token's `[nbf, exp]` window.
    Expired,
    /// Not a structurally valid JWT (wrong part count, bad base64,
    /// undecodable payload, oversized token).
    Malformed,
}

impl RejectionReason {
    /// Stable label for log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::BadSignature => "bad_signature",
            RejectionReason::WrongIssuer => "wrong_issuer",
            RejectionReason::WrongAudience => "wrong_audience",
            RejectionReason::Expired => "expired",
            RejectionReason::Malformed => "malformed",
        }
    }
}

/// Errors produced by the token subsystem.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or invalid key/policy material. Fatal at startup; a
    /// service must not serve traffic with a broken policy.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed issuance request (empty audience, incomplete user
    /// record). Surfaced to the caller as a client error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token failed validation. The message is intentionally generic;
    /// the reason is for logs only.
    #[error("The access token is invalid or expired")]
    Rejected(RejectionReason),
}

impl AuthError {
    /// The rejection reason, if this is a validation failure.
    #[must_use]
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            AuthError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result type alias using [`AuthError`]
pub type Result<T> = std::result::Result<T, AuthError>;
