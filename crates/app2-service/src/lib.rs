//! Relying service for audience "App2".
//!
//! Validates bearer tokens under its own audience policy and exposes
//! one protected echo endpoint. It never mints tokens.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
