//! Authentication and token configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing and verifying tokens
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: default_access_expiry(),
            refresh_token_expiry: default_refresh_expiry(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `JWT_SECRET`, `JWT_EXPIRE_SECONDS` and `JWT_REFRESH_EXPIRE_SECONDS`.
    /// Missing, unparsable or non-positive lifetimes keep their defaults.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        let access_token_expiry = positive_env("JWT_EXPIRE_SECONDS").unwrap_or_else(default_access_expiry);
        let refresh_token_expiry =
            positive_env("JWT_REFRESH_EXPIRE_SECONDS").unwrap_or_else(default_refresh_expiry);

        Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Override the access token lifetime
    pub fn with_access_expiry(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Override the refresh token lifetime
    pub fn with_refresh_expiry(mut self, seconds: i64) -> Self {
        self.refresh_token_expiry = seconds;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Read a strictly positive integer from the environment
pub(crate) fn positive_env(key: &str) -> Option<i64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}

fn default_access_expiry() -> i64 {
    86_400 // 1 day
}

fn default_refresh_expiry() -> i64 {
    604_800 // 7 days
}
