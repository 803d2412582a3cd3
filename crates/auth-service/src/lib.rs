//! Central token issuer for the multi-audience JWT demo.
//!
//! Authenticates users against a pluggable user directory and mints
//! HMAC-SHA-256 signed tokens scoped to the audience the caller asked
//! for. Validation happens in the relying services, not here.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
