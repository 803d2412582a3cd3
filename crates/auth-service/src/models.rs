//! User identity records, sourced from the external directory.

use chrono::NaiveDateTime;
use common::secret::SecretString;
use serde::Deserialize;
use std::fmt;

/// Identity record as loaded from the user directory document.
///
/// Immutable once loaded; the token subsystem only references it. The
/// directory document uses PascalCase member names, kept as the wire
/// contract here.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Opaque credential, compared verbatim against login attempts.
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDateTime,
    pub role: String,
    pub country: String,
}

impl User {
    /// Display name claim value.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use common::secret::ExposeSecret;

    #[test]
    fn deserializes_directory_document_shape() {
        let json = r#"{
            "Id": 42,
            "Email": "jane.smith@example.com",
            "Password": "SecurePass123!",
            "FirstName": "Jane",
            "LastName": "Smith",
            "DateOfBirth": "1990-05-14T00:00:00",
            "Role": "User",
            "Country": "Canada"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.email, "jane.smith@example.com");
        assert_eq!(user.password.expose_secret(), "SecurePass123!");
        assert_eq!(user.display_name(), "Jane Smith");
        assert_eq!(user.role, "User");
        assert_eq!(
            user.date_of_birth.format("%d/%m/%Y").to_string(),
            "14/05/1990"
        );
    }

    #[test]
    fn debug_redacts_email_and_password() {
        let json = r#"{
            "Id": 1,
            "Email": "john.doe@example.com",
            "Password": "Password123!",
            "FirstName": "John",
            "LastName": "Doe",
            "DateOfBirth": "1985-01-02T00:00:00",
            "Role": "Admin",
            "Country": "USA"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        let debug_str = format!("{user:?}");
        assert!(!debug_str.contains("john.doe@example.com"));
        assert!(!debug_str.contains("Password123!"));
        assert!(debug_str.contains("Admin"));
    }
}
