//! Relying-service configuration for App1.

use common::error::AuthError;
use common::policy::AudiencePolicy;
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7080";
const DEFAULT_ISSUER: &str = "Demo";
const DEFAULT_AUDIENCE: &str = "App1";
const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:7044";
const DEFAULT_APP2_SERVICE_URL: &str = "http://localhost:7233";

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
    /// Base URL of the token issuer.
    pub auth_service_url: String,
    /// Base URL of the sibling App2 service, for the service-test flow.
    pub app2_service_url: String,
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

        let get_or = |name: &str, default: &str| {
            vars.get(name).cloned().unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            bind_address: get_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            signing_key,
            issuer: get_or("JWT_ISSUER", DEFAULT_ISSUER),
            audience: get_or("JWT_AUDIENCE", DEFAULT_AUDIENCE),
            auth_service_url: get_or("AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL),
            app2_service_url: get_or("APP2_SERVICE_URL", DEFAULT_APP2_SERVICE_URL),
        })
    }

    /// Build this service's validation policy.
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
