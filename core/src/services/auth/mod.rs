//! Authentication service module
//!
//! This module provides the session lifecycle:
//! - Password login guarded by the login-risk lockout
//! - Registration
//! - Refresh token rotation
//! - Logout of one session or of every session for a user

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
