//! The claim set embedded in every issued token.
//!
//! Issued tokens carry the registered JWT claims plus the OIDC-style
//! identity claims the relying services consume for authorization
//! decisions. The set is constructed fresh per issuance and never
//! mutated after signing; the signature covers all of it.
//!
//! # Security
//!
//! `sub`, `email`, and `jti` identify a user or a concrete token and are
//! redacted in `Debug` output so they cannot leak through logging.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication method marker carried in `amr`.
pub const AMR_USER_CREDENTIALS: &str = "UserCredentials";

/// Date-of-birth claim format (`birthdate`): day/month/year.
pub const BIRTHDATE_FORMAT: &str = "%d/%m/%Y";

/// Full claim set of an issued token.
///
/// Invariant: `iss` and `aud` always equal the issuer/audience the token
/// was minted for, and `exp` is derived from the same captured timestamp
/// as `iat`, `nbf`, and `auth_time` — one clock read per issuance.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer of the token.
    pub iss: String,
    /// Relying service the token is intended for.
    pub aud: String,
    /// Subject (user id) - redacted in Debug output.
    pub sub: String,
    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,
    /// Not-before timestamp. Absent means valid from issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
    /// Unique token identifier - uniqueness only, no server-side
    /// tracking. Redacted in Debug output.
    pub jti: String,
    /// Unique per-issuance value for anti-replay.
    pub nonce: String,
    /// Authorized party (application id).
    pub azp: String,
    /// Authentication context class reference.
    pub acr: String,
    /// Authentication method reference.
    pub amr: String,
    /// Instant the user authenticated, same clock read as `iat`.
    pub auth_time: i64,
    /// User's display name.
    pub name: String,
    /// User's email address - redacted in Debug output.
    pub email: String,
    /// User's role (single value, e.g. "Admin").
    pub role: String,
    /// User's first name.
    pub given_name: String,
    /// User's last name.
    pub family_name: String,
    /// Date of birth, day/month/year.
    pub birthdate: String,
    /// User's country.
    pub country: String,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("jti", &"[REDACTED]")
            .field("azp", &self.azp)
            .field("amr", &self.amr)
            .field("role", &self.role)
            .field("email", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Claims {
    /// Check if the token carries a specific role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Token lifetime in seconds as embedded in the claim set.
    #[must_use]
    pub fn lifetime_secs(&self) -> i64 {
        self.exp - self.iat
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            iss: "Demo".to_string(),
            aud: "App1".to_string(),
            sub: "42".to_string(),
            iat: 1_700_000_000,
            nbf: Some(1_700_000_000),
            exp: 1_700_001_800,
            jti: "b7f9c1f2-0000-4000-8000-000000000000".to_string(),
            nonce: "5a5a5a5a-0000-4000-8000-000000000000".to_string(),
            azp: "jwt-demo".to_string(),
            acr: "JwtBearer".to_string(),
            amr: AMR_USER_CREDENTIALS.to_string(),
            auth_time: 1_700_000_000,
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            role: "User".to_string(),
            given_name: "Jane".to_string(),
            family_name: "Smith".to_string(),
            birthdate: "14/05/1990".to_string(),
            country: "Canada".to_string(),
        }
    }

    #[test]
    fn debug_redacts_identifying_fields() {
        let claims = sample();
        let debug_str = format!("{claims:?}");

        assert!(!debug_str.contains("42"), "sub must be redacted");
        assert!(!debug_str.contains("jane.smith@example.com"));
        assert!(!debug_str.contains("b7f9c1f2"));
        assert!(debug_str.contains("[REDACTED]"));
        // Non-sensitive fields stay visible
        assert!(debug_str.contains("App1"));
        assert!(debug_str.contains("User"));
    }

    #[test]
    fn has_role_is_exact_match() {
        let claims = sample();
        assert!(claims.has_role("User"));
        assert!(!claims.has_role("Admin"));
        assert!(!claims.has_role("use"));
    }

    #[test]
    fn lifetime_is_exp_minus_iat() {
        assert_eq!(sample().lifetime_secs(), 1800);
    }

    #[test]
    fn serialization_round_trip() {
        let claims = sample();
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();

        assert_eq!(back.iss, claims.iss);
        assert_eq!(back.aud, claims.aud);
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.exp, claims.exp);
        assert_eq!(back.nbf, claims.nbf);
        assert_eq!(back.birthdate, claims.birthdate);
    }

    #[test]
    fn nbf_omitted_when_absent() {
        let mut claims = sample();
        claims.nbf = None;

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("nbf"));

        let back: Claims = serde_json::from_str(&json).unwrap();
        assert!(back.nbf.is_none());
    }
}
