//! Claim construction and token signing.
//!
//! One issuance is: capture the clock once, derive the full claim set
//! from it, sign with HMAC-SHA-256. The subsystem keeps no state across
//! calls — everything a validator needs is embedded in the token.

use crate::config::Config;
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use common::claims::{Claims, AMR_USER_CREDENTIALS, BIRTHDATE_FORMAT};
use common::error::AuthError;
use common::secret::ExposeSecret;
use common::types::TokenKind;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Output of issuance: the serialized signed token plus the expiry
/// instant its lifetime was computed from.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Lifetime for a token kind. Access and refresh lifetimes are
/// independently configured; the kind flag is the only selector.
fn lifetime_for(config: &Config, kind: TokenKind) -> Duration {
    let minutes = match kind {
        TokenKind::Access => config.access_ttl_minutes,
        TokenKind::Refresh => config.refresh_ttl_minutes,
    };
    Duration::minutes(minutes)
}

/// Derive the complete claim set for one token.
///
/// Pure function of its inputs: `now` is captured once by the caller
/// and drives `iat`, `nbf`, `auth_time`, and `exp` alike, so the expiry
/// embedded in the payload can never drift from the token's structural
/// lifetime.
///
/// # Errors
///
/// Returns [`AuthError::InvalidInput`] for an empty audience or an
/// incomplete user record.
pub fn build_claims(
    config: &Config,
    user: &User,
    audience: &str,
    kind: TokenKind,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    if audience.is_empty() {
        return Err(AuthError::InvalidInput(
            "audience must not be empty".to_string(),
        ));
    }
    if user.email.is_empty() || user.first_name.is_empty() || user.last_name.is_empty() {
        return Err(AuthError::InvalidInput(
            "user record is incomplete".to_string(),
        ));
    }

    let issued_at = now.timestamp();
    let expires_at = now + lifetime_for(config, kind);

    Ok(Claims {
        iss: config.issuer.clone(),
        aud: audience.to_string(),
        sub: user.id.to_string(),
        iat: issued_at,
        nbf: Some(issued_at),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
        nonce: Uuid::new_v4().to_string(),
        azp: config.app_id.clone(),
        acr: "JwtBearer".to_string(),
        amr: AMR_USER_CREDENTIALS.to_string(),
        auth_time: issued_at,
        name: user.display_name(),
        email: user.email.clone(),
        role: user.role.clone(),
        given_name: user.first_name.clone(),
        family_name: user.last_name.clone(),
        birthdate: user.date_of_birth.format(BIRTHDATE_FORMAT).to_string(),
        country: user.country.clone(),
    })
}

/// Sign a claim set into a compact three-part token.
///
/// # Errors
///
/// Returns [`AuthError::Configuration`] for an empty signing key and
/// [`AuthError::Configuration`] if encoding itself fails.
pub fn sign_claims(config: &Config, claims: &Claims) -> Result<String, AuthError> {
    let key = config.signing_key.expose_secret();
    if key.is_empty() {
        return Err(AuthError::Configuration(
            "signing key must not be empty".to_string(),
        ));
    }

    let header = Header::new(Algorithm::HS256);
    encode(&header, claims, &EncodingKey::from_secret(key.as_bytes()))
        .map_err(|e| AuthError::Configuration(format!("token signing failed: {e}")))
}

/// Issue a signed token for `user`, scoped to `audience`, with the
/// lifetime selected by `kind`.
///
/// # Errors
///
/// Propagates [`AuthError::InvalidInput`] from claim construction and
/// [`AuthError::Configuration`] from signing.
pub fn issue_token(
    config: &Config,
    user: &User,
    audience: &str,
    kind: TokenKind,
) -> Result<IssuedToken, AuthError> {
    // Single clock read per issuance; every time-derived claim comes
    // from this instant.
    let now = Utc::now();
    let claims = build_claims(config, user, audience, kind, now)?;
    let expires_at = now + lifetime_for(config, kind);
    let token = sign_claims(config, &claims)?;

    tracing::debug!(
        target: "auth.token",
        audience = audience,
        kind = ?kind,
        expires_at = %expires_at,
        "Issued token"
    );

    Ok(IssuedToken { token, expires_at })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::policy::AudiencePolicy;
    use std::collections::HashMap;

    const KEY: &str = "demo-signing-key-demo-signing-key";

    fn config() -> Config {
        Config::from_vars(&HashMap::from([(
            "JWT_SIGNING_KEY".to_string(),
            KEY.to_string(),
        )]))
        .expect("test config")
    }

    fn jane() -> User {
        serde_json::from_str(
            r#"{
                "Id": 42,
                "Email": "jane.smith@example.com",
                "Password": "SecurePass123!",
                "FirstName": "Jane",
                "LastName": "Smith",
                "DateOfBirth": "1990-05-14T00:00:00",
                "Role": "User",
                "Country": "Canada"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn claim_set_is_internally_consistent() {
        let config = config();
        let now = Utc::now();
        let claims = build_claims(&config, &jane(), "App1", TokenKind::Access, now).unwrap();

        assert_eq!(claims.iss, "Demo");
        assert_eq!(claims.aud, "App1");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.azp, "jwt-demo");
        assert_eq!(claims.amr, AMR_USER_CREDENTIALS);
        assert_eq!(claims.name, "Jane Smith");
        assert_eq!(claims.given_name, "Jane");
        assert_eq!(claims.family_name, "Smith");
        assert_eq!(claims.birthdate, "14/05/1990");
        assert_eq!(claims.country, "Canada");

        // One captured timestamp drives every time-derived claim.
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, Some(claims.iat));
        assert_eq!(claims.auth_time, claims.iat);
        assert_eq!(claims.lifetime_secs(), config.access_ttl_minutes * 60);
    }

    #[test]
    fn refresh_lifetime_strictly_exceeds_access_at_same_instant() {
        let config = config();
        let now = Utc::now();

        let access = build_claims(&config, &jane(), "App1", TokenKind::Access, now).unwrap();
        let refresh = build_claims(&config, &jane(), "App1", TokenKind::Refresh, now).unwrap();

        assert_eq!(access.iat, refresh.iat);
        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.lifetime_secs(), config.refresh_ttl_minutes * 60);
    }

    #[test]
    fn jti_and_nonce_unique_per_issuance() {
        let config = config();
        let now = Utc::now();

        let a = build_claims(&config, &jane(), "App1", TokenKind::Access, now).unwrap();
        let b = build_claims(&config, &jane(), "App1", TokenKind::Access, now).unwrap();

        assert_ne!(a.jti, b.jti);
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn empty_audience_is_invalid_input() {
        let result = build_claims(&config(), &jane(), "", TokenKind::Access, Utc::now());
        assert!(matches!(result, Err(AuthError::InvalidInput(_))));
    }

    #[test]
    fn issued_token_round_trips_through_matching_policy() {
        let config = config();
        let issued = issue_token(&config, &jane(), "App1", TokenKind::Access).unwrap();

        let policy = AudiencePolicy::new("Demo", "App1", KEY.as_bytes()).unwrap();
        let identity = policy.validate(&issued.token).unwrap();

        assert_eq!(identity.subject(), "42");
        assert_eq!(identity.role(), "User");
        assert_eq!(identity.claims().exp, issued.expires_at.timestamp());
    }

    #[test]
    fn issued_token_rejected_by_other_audience_policy() {
        let config = config();
        let issued = issue_token(&config, &jane(), "App1", TokenKind::Access).unwrap();

        let app2 = AudiencePolicy::new("Demo", "App2", KEY.as_bytes()).unwrap();
        assert!(app2.validate(&issued.token).is_err());
    }

    #[test]
    fn empty_signing_key_is_a_configuration_error() {
        // Bypass config validation to exercise the signing-time check.
        let mut config = config();
        config.signing_key = common::secret::SecretString::from("");

        let claims =
            build_claims(&config, &jane(), "App1", TokenKind::Access, Utc::now()).unwrap();
        let result = sign_claims(&config, &claims);
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn issuance_succeeds_at_maximum_configured_lifetime() {
        // The largest lifetime the config accepts must stay well inside
        // duration arithmetic bounds.
        let config = Config::from_vars(&HashMap::from([
            ("JWT_SIGNING_KEY".to_string(), KEY.to_string()),
            ("REFRESH_TOKEN_TTL_MINUTES".to_string(), "525600".to_string()),
        ]))
        .unwrap();

        let issued = issue_token(&config, &jane(), "App1", TokenKind::Refresh).unwrap();
        let policy = AudiencePolicy::new("Demo", "App1", KEY.as_bytes()).unwrap();
        assert!(policy.validate(&issued.token).is_ok());
    }

    #[test]
    fn token_has_three_parts() {
        let issued = issue_token(&config(), &jane(), "App1", TokenKind::Access).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }
}
