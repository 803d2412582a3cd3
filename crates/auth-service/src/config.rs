//! Issuer configuration, loaded once at startup from the environment.

use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7044";
const DEFAULT_ISSUER: &str = "Demo";
const DEFAULT_APP_ID: &str = "jwt-demo";
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 30;
const DEFAULT_REFRESH_TTL_MINUTES: i64 = 1440;
/// Upper bound on configured lifetimes: one year in minutes. Values
/// past this are configuration mistakes, and an unbounded value would
/// overflow duration arithmetic at issuance time.
const MAX_TTL_MINUTES: i64 = 525_600;
const DEFAULT_USER_DIRECTORY_URL: &str =
    "https://raw.githubusercontent.com/RoslynSoftware/TestData/refs/heads/main/users.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Process-wide immutable configuration for the issuer.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Symmetric HS256 signing key shared with the relying services.
    pub signing_key: SecretString,
    /// `iss` claim stamped into every token.
    pub issuer: String,
    /// `azp` (authorized party) claim value.
    pub app_id: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
    /// Remote JSON document the user directory is loaded from.
    pub user_directory_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the signing key is missing or empty, or
    /// a lifetime is outside `1..=MAX_TTL_MINUTES`. Startup must fail
    /// on these; serving traffic without a usable key would make every
    /// issued token unverifiable, and an unbounded lifetime would blow
    /// up duration arithmetic at issuance time instead of here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a map (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let signing_key = SecretString::from(
            vars.get("JWT_SIGNING_KEY")
                .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SIGNING_KEY".to_string()))?
                .clone(),
        );
        if signing_key.expose_secret().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SIGNING_KEY".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let access_ttl_minutes =
            parse_positive_minutes(vars, "ACCESS_TOKEN_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?;
        let refresh_ttl_minutes =
            parse_positive_minutes(vars, "REFRESH_TOKEN_TTL_MINUTES", DEFAULT_REFRESH_TTL_MINUTES)?;

        Ok(Config {
            bind_address: vars
                .get("BIND_ADDRESS")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            signing_key,
            issuer: vars
                .get("JWT_ISSUER")
                .cloned()
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            app_id: vars
                .get("JWT_APP_ID")
                .cloned()
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            access_ttl_minutes,
            refresh_ttl_minutes,
            user_directory_url: vars
                .get("USER_DIRECTORY_URL")
                .cloned()
                .unwrap_or_else(|| DEFAULT_USER_DIRECTORY_URL.to_string()),
        })
    }
}

fn parse_positive_minutes(
    vars: &HashMap<String, String>,
    name: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    let minutes = match vars.get(name) {
        Some(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        })?,
        None => default,
    };

    if minutes <= 0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("must be a positive number of minutes, got {minutes}"),
        });
    }
    if minutes > MAX_TTL_MINUTES {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("must be at most {MAX_TTL_MINUTES} minutes, got {minutes}"),
        });
    }

    Ok(minutes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "JWT_SIGNING_KEY".to_string(),
            "demo-signing-key-demo-signing-key".to_string(),
        )])
    }

    #[test]
    fn defaults_applied() {
        let config = Config::from_vars(&base_vars()).expect("config should load");

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.issuer, "Demo");
        assert_eq!(config.app_id, "jwt-demo");
        assert_eq!(config.access_ttl_minutes, 30);
        assert_eq!(config.refresh_ttl_minutes, 1440);
    }

    #[test]
    fn refresh_default_exceeds_access_default() {
        let config = Config::from_vars(&base_vars()).unwrap();
        assert!(config.refresh_ttl_minutes > config.access_ttl_minutes);
    }

    #[test]
    fn missing_signing_key_rejected() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "JWT_SIGNING_KEY"));
    }

    #[test]
    fn empty_signing_key_rejected() {
        let vars = HashMap::from([("JWT_SIGNING_KEY".to_string(), String::new())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "JWT_SIGNING_KEY"
        ));
    }

    #[test]
    fn zero_ttl_rejected() {
        let mut vars = base_vars();
        vars.insert("ACCESS_TOKEN_TTL_MINUTES".to_string(), "0".to_string());
        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "ACCESS_TOKEN_TTL_MINUTES"
        ));
    }

    #[test]
    fn oversized_ttl_rejected_at_startup() {
        // i64::MAX minutes parses fine but must never reach issuance.
        let mut vars = base_vars();
        vars.insert(
            "REFRESH_TOKEN_TTL_MINUTES".to_string(),
            i64::MAX.to_string(),
        );
        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "REFRESH_TOKEN_TTL_MINUTES"
        ));
    }

    #[test]
    fn ttl_at_upper_bound_accepted() {
        let mut vars = base_vars();
        vars.insert(
            "REFRESH_TOKEN_TTL_MINUTES".to_string(),
            MAX_TTL_MINUTES.to_string(),
        );
        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.refresh_ttl_minutes, MAX_TTL_MINUTES);
    }

    #[test]
    fn non_numeric_ttl_rejected() {
        let mut vars = base_vars();
        vars.insert(
            "REFRESH_TOKEN_TTL_MINUTES".to_string(),
            "a-day-ish".to_string(),
        );
        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "REFRESH_TOKEN_TTL_MINUTES"
        ));
    }

    #[test]
    fn overrides_respected() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("JWT_ISSUER".to_string(), "OtherIssuer".to_string());
        vars.insert("ACCESS_TOKEN_TTL_MINUTES".to_string(), "5".to_string());

        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.issuer, "OtherIssuer");
        assert_eq!(config.access_ttl_minutes, 5);
    }

    #[test]
    fn signing_key_debug_is_redacted() {
        let config = Config::from_vars(&base_vars()).unwrap();
        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("demo-signing-key"));
        assert!(debug_str.contains("REDACTED"));
    }
}
