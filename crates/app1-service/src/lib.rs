//! Relying service for audience "App1".
//!
//! Plays the browser-facing part of the demo: logs demo users in
//! against the issuer, keeps the obtained token in a server-side
//! session, relays it as a bearer credential on every request, and
//! serves plain and role-gated protected pages. Also demonstrates a
//! service-to-service call by obtaining an App2 token and invoking
//! App2's protected endpoint.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
