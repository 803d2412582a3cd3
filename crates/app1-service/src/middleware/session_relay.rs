//! Session-to-bearer relay middleware.
//!
//! Runs before bearer authentication. If the request carries a session
//! cookie and that session holds a non-empty token, the token is
//! injected as `Authorization: Bearer <token>` so downstream middleware
//! sees an ordinary bearer request. No validation happens here.

use crate::session::{SessionStore, SESSION_COOKIE, TOKEN_KEY};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub async fn relay_session_token(
    State(sessions): State<Arc<SessionStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(&sessions, &request) {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => {
                request.headers_mut().insert(header::AUTHORIZATION, value);
            }
            Err(_) => {
                // A token with non-header-safe bytes cannot be a valid
                // JWT anyway; leave the request untouched and let the
                // bearer middleware reject it.
                tracing::debug!(
                    target: "app1.session",
                    "Session token not relayable as a header value"
                );
            }
        }
    }
    next.run(request).await
}

fn session_token(sessions: &SessionStore, request: &Request) -> Option<String> {
    let session_id = cookie_value(request, SESSION_COOKIE)?;
    let token = sessions.get(&session_id, TOKEN_KEY)?;
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn cookie_value(request: &Request, name: &str) -> Option<String> {
    let cookies = request.headers().get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_cookie(cookie: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/secure");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn cookie_parsed_among_several() {
        let request =
            request_with_cookie(Some("theme=dark; demo_session=abc-123; lang=en"));
        assert_eq!(
            cookie_value(&request, SESSION_COOKIE),
            Some("abc-123".to_string())
        );
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        let request = request_with_cookie(None);
        assert_eq!(cookie_value(&request, SESSION_COOKIE), None);
    }

    #[test]
    fn token_looked_up_from_session() {
        let sessions = SessionStore::new();
        let id = sessions.create();
        sessions.insert(&id, TOKEN_KEY, "signed.jwt.here".to_string());

        let request = request_with_cookie(Some(&format!("demo_session={id}")));
        assert_eq!(
            session_token(&sessions, &request),
            Some("signed.jwt.here".to_string())
        );
    }

    #[test]
    fn empty_session_token_is_not_relayed() {
        let sessions = SessionStore::new();
        let id = sessions.create();
        sessions.insert(&id, TOKEN_KEY, String::new());

        let request = request_with_cookie(Some(&format!("demo_session={id}")));
        assert_eq!(session_token(&sessions, &request), None);
    }
}
