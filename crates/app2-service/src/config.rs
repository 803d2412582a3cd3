//! Relying-service configuration for App2.

use common::error::AuthError;
use common::policy::AudiencePolicy;
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7233";
const DEFAULT_ISSUER: &str = "Demo";
const DEFAULT_AUDIENCE: &str = "App2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid policy configuration: {0}")]
    InvalidPolicy(#[from] AuthError),
}

/// Process-wide immutable configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub signing_key: SecretString,
    pub issuer: String,
    pub audience: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the signing key is missing.
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
            audience: vars
                .get("JWT_AUDIENCE")
                .cloned()
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
        })
    }

    /// Build this service's validation policy. An empty key or
    /// issuer/audience fails here, before the service binds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPolicy` on bad policy material.
    pub fn audience_policy(&self) -> Result<AudiencePolicy, ConfigError> {
        Ok(AudiencePolicy::new(
            &self.issuer,
            &self.audience,
            self.signing_key.expose_secret().as_bytes(),
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let vars = HashMap::from([(
            "JWT_SIGNING_KEY".to_string(),
            "demo-signing-key-demo-signing-key".to_string(),
        )]);
        let config = Config::from_vars(&vars).expect("config should load");

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.issuer, "Demo");
        assert_eq!(config.audience, "App2");
        assert!(config.audience_policy().is_ok());
    }

    #[test]
    fn missing_signing_key_rejected() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "JWT_SIGNING_KEY"));
    }

    #[test]
    fn empty_signing_key_fails_policy_construction() {
        let vars = HashMap::from([("JWT_SIGNING_KEY".to_string(), String::new())]);
        let config = Config::from_vars(&vars).unwrap();
        assert!(matches!(
            config.audience_policy(),
            Err(ConfigError::InvalidPolicy(_))
        ));
    }
}
