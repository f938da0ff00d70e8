//! Token issuing module for JWT management
//!
//! This module handles:
//! - HS256 access and refresh token signing
//! - Stateless access token verification
//! - Refresh token parsing and hashing for the durable store
//! - Background cleanup of expired refresh token rows

mod cleanup;
mod config;
mod service;


pub use cleanup::{TokenCleanupConfig, TokenCleanupService};
pub use config::TokenIssuerConfig;
pub use service::{hash_token, IssuedRefreshToken, TokenIssuer};
