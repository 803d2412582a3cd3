//! In-memory server-side session store.
//!
//! Sessions are keyed by a random id carried in a cookie. Values are
//! plain string key/value pairs; the only key the demo uses is
//! [`TOKEN_KEY`], holding the bearer token obtained at login. Tokens
//! never reach the browser directly.

use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "demo_session";

/// Session key under which the login flow stores the issued token.
pub const TOKEN_KEY: &str = "token";

/// Process-local session store. Lives for the process lifetime; there
/// is no expiry, which is acceptable for a demo surface.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty session and return its id.
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id.clone(), HashMap::new());
        id
    }

    /// Store a value in an existing session. Unknown session ids are
    /// ignored; the caller's cookie no longer names a live session.
    pub fn insert(&self, session_id: &str, key: &str, value: String) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(session) = sessions.get_mut(session_id) {
            session.insert(key.to_string(), value);
        }
    }

    /// Look up a value in a session.
    #[must_use]
    pub fn get(&self, session_id: &str, key: &str) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(session_id)
            .and_then(|session| session.get(key).cloned())
    }
}
