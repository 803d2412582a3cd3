//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports from the [`secrecy`] crate. Use these for every sensitive
//! value in the demo: user passwords, the symmetric signing key, and
//! bearer tokens held by the client wrappers.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` while holding one cannot leak the value via `{:?}` or
//! tracing. Access requires an explicit `expose_secret()` call, and the
//! value is zeroized on drop.
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Login {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let login = Login {
//!     email: "jane@example.com".to_string(),
//!     password: SecretString::from("hunter2"),
//! };
//!
//! // Safe: password renders as [REDACTED]
//! println!("{login:?}");
//!
//! let password: &str = login.password.expose_secret();
//! # assert_eq!(password, "hunter2");
//! ```

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let secret = SecretString::from("SecurePass123!");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("SecurePass123!"));
    }

    #[test]
    fn expose_secret_returns_inner_value() {
        let secret = SecretString::from("Password123!");
        assert_eq!(secret.expose_secret(), "Password123!");
    }

    #[test]
    fn deserialized_secret_is_redacted() {
        use serde::Deserialize;

        #[derive(Debug, Deserialize)]
        struct Credentials {
            email: String,
            password: SecretString,
        }

        let json = r#"{"email": "john@example.com", "password": "Password123!"}"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();

        let debug_str = format!("{creds:?}");
        assert!(debug_str.contains("john@example.com"));
        assert!(!debug_str.contains("Password123!"));
    }
}
