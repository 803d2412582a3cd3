pub mod auth;
pub mod session_relay;
