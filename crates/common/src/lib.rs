//! Shared types for the multi-audience JWT demo services.

#![warn(clippy::pedantic)]

/// Module for shared error types and the token rejection taxonomy
pub mod error;

/// Module for the token claim set
pub mod claims;

/// Module for per-audience validation policies
pub mod policy;

/// Module for shared request/response types
pub mod types;

/// Module for secret types that prevent accidental logging
pub mod secret;
