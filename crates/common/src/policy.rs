//! Per-audience token validation.
//!
//! Each relying service configures one [`AudiencePolicy`] at startup:
//! the issuer it trusts, the audience it answers to, and the symmetric
//! key tokens must be signed with. Validation is fail-closed — a token
//! is accepted only if the signature, issuer, audience, and lifetime
//! window all check out against exactly this policy.
//!
//! Two services sharing a signing key still use distinct policies; a
//! token minted for audience "App1" must be rejected by the "App2"
//! policy. That audience isolation is the core security property of the
//! multi-service design.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HMAC-SHA-256 is accepted; other algorithms fail verification
//! - Rejection reasons go to debug logs, never to the caller

use crate::claims::Claims;
use crate::error::{AuthError, RejectionReason};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::fmt;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Oversized tokens are rejected before base64 decoding or signature
/// verification to bound the work an attacker can force per request.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Default clock-skew grace applied to `nbf`/`exp` checks (30 seconds).
///
/// Issuer and validators run on different hosts; a small grace window
/// keeps freshly minted tokens usable across minor clock drift.
pub const DEFAULT_LEEWAY_SECS: i64 = 30;

/// The issuer/audience/key triple a validator enforces.
///
/// Built once per relying service at startup and treated as read-only
/// for the process lifetime. Validation itself is stateless, so one
/// policy may be shared across any number of concurrent requests.
#[derive(Clone)]
pub struct AudiencePolicy {
    issuer: String,
    audience: String,
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_secs: i64,
}

impl fmt::Debug for AudiencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudiencePolicy")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("key", &"[REDACTED]")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl AudiencePolicy {
    /// Create a policy for one relying service.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the issuer, audience, or
    /// key is empty. A service must refuse to start on such a policy
    /// rather than silently accept nothing (or worse, everything).
    pub fn new(issuer: &str, audience: &str, key: &[u8]) -> Result<Self, AuthError> {
        if issuer.is_empty() {
            return Err(AuthError::Configuration(
                "policy issuer must not be empty".to_string(),
            ));
        }
        if audience.is_empty() {
            return Err(AuthError::Configuration(
                "policy audience must not be empty".to_string(),
            ));
        }
        if key.is_empty() {
            return Err(AuthError::Configuration(
                "policy signing key must not be empty".to_string(),
            ));
        }

        // The library verifies structure + signature; issuer, audience,
        // and the lifetime window are checked manually afterwards so
        // each failure maps to a distinct rejection reason and so the
        // clock can be injected in tests.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Override the clock-skew grace window. Zero disables it, which is
    /// what the expiry-boundary tests use.
    #[must_use]
    pub fn with_leeway_secs(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// The issuer this policy expects.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The audience this policy expects.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Validate a presented token against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the matching
    /// [`RejectionReason`] on any failed check.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }

    /// Deterministic validation against an explicit `now` timestamp.
    ///
    /// Prefer [`AudiencePolicy::validate`] in production code. This
    /// variant exists so lifetime boundary conditions can be tested
    /// without wall-clock dependence.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<AuthenticatedIdentity, AuthError> {
        // Size check before any parsing or cryptographic work.
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "common.policy",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(AuthError::Rejected(RejectionReason::Malformed));
        }

        // Step 1: structure + signature under the policy key.
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let reason = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature
                    | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                    | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                        RejectionReason::BadSignature
                    }
                    _ => RejectionReason::Malformed,
                };
                tracing::debug!(
                    target: "common.policy",
                    error = %e,
                    reason = reason.as_str(),
                    "Token rejected during decode"
                );
                AuthError::Rejected(reason)
            })?;
        let claims = token_data.claims;

        // Step 2: issuer must match exactly.
        if claims.iss != self.issuer {
            tracing::debug!(
                target: "common.policy",
                expected = %self.issuer,
                reason = "wrong_issuer",
                "Token rejected: issuer mismatch"
            );
            return Err(AuthError::Rejected(RejectionReason::WrongIssuer));
        }

        // Step 3: audience must match exactly. A token for a sibling
        // service is well-formed and correctly signed but still invalid
        // here.
        if claims.aud != self.audience {
            tracing::debug!(
                target: "common.policy",
                expected = %self.audience,
                presented = %claims.aud,
                reason = "wrong_audience",
                "Token rejected: audience mismatch"
            );
            return Err(AuthError::Rejected(RejectionReason::WrongAudience));
        }

        // Step 4: lifetime window. The exp instant itself is still
        // valid; absent nbf is treated as satisfied from issuance.
        if let Some(nbf) = claims.nbf {
            if now.saturating_add(self.leeway_secs) < nbf {
                tracing::debug!(
                    target: "common.policy",
                    nbf = nbf,
                    now = now,
                    reason = "expired",
                    "Token rejected: not yet valid"
                );
                return Err(AuthError::Rejected(RejectionReason::Expired));
            }
        }
        if now > claims.exp.saturating_add(self.leeway_secs) {
            tracing::debug!(
                target: "common.policy",
                exp = claims.exp,
                now = now,
                reason = "expired",
                "Token rejected: past expiry"
            );
            return Err(AuthError::Rejected(RejectionReason::Expired));
        }

        Ok(AuthenticatedIdentity::from_claims(claims))
    }
}

/// The outcome of successful validation, handed to downstream handlers
/// for authorization decisions.
#[derive(Clone)]
pub struct AuthenticatedIdentity {
    subject: String,
    role: String,
    claims: Claims,
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("subject", &"[REDACTED]")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedIdentity {
    fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role.clone(),
            claims,
        }
    }

    /// Subject (user id) the token was issued for.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Role claim carried by the token.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Exact-match role check for role-gated endpoints.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    /// Full claim set for anything beyond subject/role.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::claims::AMR_USER_CREDENTIALS;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const KEY: &[u8] = b"demo-signing-key-demo-signing-key";
    const NOW: i64 = 1_700_000_000;

    fn claims_for(audience: &str, issued_at: i64, lifetime_secs: i64) -> Claims {
        Claims {
            iss: "Demo".to_string(),
            aud: audience.to_string(),
            sub: "42".to_string(),
            iat: issued_at,
            nbf: Some(issued_at),
            exp: issued_at + lifetime_secs,
            jti: uuid::Uuid::new_v4().to_string(),
            nonce: uuid::Uuid::new_v4().to_string(),
            azp: "jwt-demo".to_string(),
            acr: "JwtBearer".to_string(),
            amr: AMR_USER_CREDENTIALS.to_string(),
            auth_time: issued_at,
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            role: "User".to_string(),
            given_name: "Jane".to_string(),
            family_name: "Smith".to_string(),
            birthdate: "14/05/1990".to_string(),
            country: "Canada".to_string(),
        }
    }

    fn sign(claims: &Claims, key: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key),
        )
        .expect("signing test token")
    }

    fn policy(audience: &str) -> AudiencePolicy {
        AudiencePolicy::new("Demo", audience, KEY).expect("test policy")
    }

    fn rejection(result: Result<AuthenticatedIdentity, AuthError>) -> RejectionReason {
        match result {
            Err(AuthError::Rejected(reason)) => reason,
            Err(other) => panic!("expected rejection, got {other:?}"),
            Ok(_) => panic!("expected rejection, token was accepted"),
        }
    }

    #[test]
    fn valid_token_yields_identity_with_subject_and_role() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);

        let identity = policy("App1").validate_at(&token, NOW + 10).unwrap();
        assert_eq!(identity.subject(), "42");
        assert_eq!(identity.role(), "User");
        assert!(identity.has_role("User"));
        assert!(!identity.has_role("Admin"));
        assert_eq!(identity.claims().email, "jane@example.com");
    }

    #[test]
    fn audience_isolation_same_key() {
        // Correctly signed for App1, presented to App2's validator.
        let token = sign(&claims_for("App1", NOW, 1800), KEY);

        let reason = rejection(policy("App2").validate_at(&token, NOW + 10));
        assert_eq!(reason, RejectionReason::WrongAudience);
    }

    #[test]
    fn wrong_issuer_rejected() {
        let mut claims = claims_for("App1", NOW, 1800);
        claims.iss = "SomeoneElse".to_string();
        let token = sign(&claims, KEY);

        let reason = rejection(policy("App1").validate_at(&token, NOW + 10));
        assert_eq!(reason, RejectionReason::WrongIssuer);
    }

    #[test]
    fn wrong_key_rejected_as_bad_signature() {
        let token = sign(&claims_for("App1", NOW, 1800), b"a-different-signing-key-entirely");

        let reason = rejection(policy("App1").validate_at(&token, NOW + 10));
        assert_eq!(reason, RejectionReason::BadSignature);
    }

    #[test]
    fn tampered_payload_rejected_as_bad_signature() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // Re-encode the payload with an elevated role, keep the
        // original signature.
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine as _;
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let json = String::from_utf8(payload).unwrap();
        let tampered = json.replace("\"role\":\"User\"", "\"role\":\"Admin\"");
        let forged = format!("{}.{}.{}", parts[0], URL_SAFE_NO_PAD.encode(tampered), parts[2]);

        let reason = rejection(policy("App1").validate_at(&forged, NOW + 10));
        assert_eq!(reason, RejectionReason::BadSignature);
    }

    #[test]
    fn garbage_rejected_as_malformed() {
        let reason = rejection(policy("App1").validate_at("not-a-jwt", NOW));
        assert_eq!(reason, RejectionReason::Malformed);

        let reason = rejection(policy("App1").validate_at("a.b", NOW));
        assert_eq!(reason, RejectionReason::Malformed);
    }

    #[test]
    fn oversized_token_rejected_before_parsing() {
        let oversized = "a".repeat(MAX_JWT_SIZE_BYTES + 1);
        let reason = rejection(policy("App1").validate_at(&oversized, NOW));
        assert_eq!(reason, RejectionReason::Malformed);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);
        let strict = policy("App1").with_leeway_secs(0);

        // One second before expiry: valid.
        assert!(strict.validate_at(&token, NOW + 1799).is_ok());
        // The exp instant itself: still valid.
        assert!(strict.validate_at(&token, NOW + 1800).is_ok());
        // One second past: expired.
        let reason = rejection(strict.validate_at(&token, NOW + 1801));
        assert_eq!(reason, RejectionReason::Expired);
    }

    #[test]
    fn thirty_minute_token_expired_after_thirty_one_minutes() {
        // A 30-minute access token checked 31 minutes after issuance.
        let token = sign(&claims_for("App1", NOW, 30 * 60), KEY);
        let app1 = policy("App1");

        assert!(app1.validate_at(&token, NOW).is_ok());
        let reason = rejection(app1.validate_at(&token, NOW + 31 * 60));
        assert_eq!(reason, RejectionReason::Expired);
    }

    #[test]
    fn leeway_extends_expiry_by_grace_window() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);
        let app1 = policy("App1"); // default 30s leeway

        assert!(app1.validate_at(&token, NOW + 1800 + DEFAULT_LEEWAY_SECS).is_ok());
        let reason = rejection(app1.validate_at(&token, NOW + 1800 + DEFAULT_LEEWAY_SECS + 1));
        assert_eq!(reason, RejectionReason::Expired);
    }

    #[test]
    fn token_before_nbf_rejected() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);
        let strict = policy("App1").with_leeway_secs(0);

        let reason = rejection(strict.validate_at(&token, NOW - 60));
        assert_eq!(reason, RejectionReason::Expired);
    }

    #[test]
    fn extreme_timestamps_do_not_overflow_the_window_check() {
        // A correctly signed token may still carry hostile time claims.
        let mut claims = claims_for("App1", NOW, 1800);
        claims.exp = i64::MAX;
        let token = sign(&claims, KEY);
        assert!(policy("App1").validate_at(&token, NOW).is_ok());

        let mut claims = claims_for("App1", NOW, 1800);
        claims.nbf = Some(i64::MAX);
        let token = sign(&claims, KEY);
        let reason = rejection(policy("App1").validate_at(&token, i64::MAX - 1));
        assert_eq!(reason, RejectionReason::Expired);
    }

    #[test]
    fn missing_nbf_is_always_satisfied() {
        let mut claims = claims_for("App1", NOW, 1800);
        claims.nbf = None;
        let token = sign(&claims, KEY);

        assert!(policy("App1").validate_at(&token, NOW).is_ok());
    }

    #[test]
    fn non_hs256_algorithm_rejected() {
        // Header claims HS384; the policy only accepts HS256.
        let claims = claims_for("App1", NOW, 1800);
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(KEY),
        )
        .unwrap();

        let reason = rejection(policy("App1").validate_at(&token, NOW + 10));
        assert_eq!(reason, RejectionReason::BadSignature);
    }

    #[test]
    fn empty_policy_parts_are_configuration_errors() {
        assert!(matches!(
            AudiencePolicy::new("", "App1", KEY),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            AudiencePolicy::new("Demo", "", KEY),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            AudiencePolicy::new("Demo", "App1", b""),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn policy_debug_redacts_key() {
        let debug_str = format!("{:?}", policy("App1"));
        assert!(debug_str.contains("App1"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn identity_debug_redacts_subject() {
        let token = sign(&claims_for("App1", NOW, 1800), KEY);
        let identity = policy("App1").validate_at(&token, NOW).unwrap();

        let debug_str = format!("{identity:?}");
        assert!(!debug_str.contains("42"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("User"));
    }
}
