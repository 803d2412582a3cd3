//! User directory collaborator.
//!
//! The issuer authenticates against a mapping from email to [`User`]
//! records. The trait is the seam that keeps credential comparison out
//! of the token core: today both implementations compare plaintext
//! passwords verbatim (this demo's design), and a future hashed scheme
//! replaces the implementation without touching issuance.

use crate::models::User;
use async_trait::async_trait;
use common::secret::ExposeSecret;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Errors from the directory collaborator. These are infrastructure
/// failures, distinct from a credential mismatch (`Ok(None)`).
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to fetch user directory: {0}")]
    Fetch(String),

    #[error("Failed to parse user directory: {0}")]
    Parse(String),
}

/// Lookup of a user by exact email + password match.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns `Ok(None)` when no record matches; errors are reserved
    /// for directory infrastructure failures.
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DirectoryError>;
}

/// Directory backed by an in-memory list. Used in tests and wherever
/// the remote document is already deserialized.
pub struct StaticUserDirectory {
    users: Vec<User>,
}

impl StaticUserDirectory {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DirectoryError> {
        Ok(find_exact(&self.users, email, password))
    }
}

/// Directory backed by a remote JSON document, fetched once per process
/// and cached for its lifetime.
pub struct RemoteUserDirectory {
    url: String,
    client: reqwest::Client,
    cache: OnceCell<Vec<User>>,
}

impl RemoteUserDirectory {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
            cache: OnceCell::new(),
        }
    }

    async fn users(&self) -> Result<&Vec<User>, DirectoryError> {
        self.cache
            .get_or_try_init(|| async {
                tracing::info!(target: "auth.directory", url = %self.url, "Fetching user directory");

                let response = self
                    .client
                    .get(&self.url)
                    .send()
                    .await
                    .map_err(|e| DirectoryError::Fetch(e.to_string()))?;

                let response = response
                    .error_for_status()
                    .map_err(|e| DirectoryError::Fetch(e.to_string()))?;

                let users: Vec<User> = response
                    .json()
                    .await
                    .map_err(|e| DirectoryError::Parse(e.to_string()))?;

                tracing::info!(
                    target: "auth.directory",
                    user_count = users.len(),
                    "User directory loaded"
                );
                Ok(users)
            })
            .await
    }
}

#[async_trait]
impl UserDirectory for RemoteUserDirectory {
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let users = self.users().await?;
        Ok(find_exact(users, email, password))
    }
}

fn find_exact(users: &[User], email: &str, password: &str) -> Option<User> {
    users
        .iter()
        .find(|u| u.email == email && u.password.expose_secret() == password)
        .cloned()
}
