//! Configuration for the token issuer

use jsonwebtoken::Algorithm;
use sg_shared::config::JwtConfig;

use crate::domain::entities::token::{
    ACCESS_TOKEN_TTL_SECONDS, MAX_ACCESS_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS,
    REFRESH_TOKEN_TTL_SECONDS,
};
use crate::errors::ValidationError;

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Default access token lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_ttl_seconds: ACCESS_TOKEN_TTL_SECONDS,
            refresh_ttl_seconds: REFRESH_TOKEN_TTL_SECONDS,
        }
    }
}

impl From<&JwtConfig> for TokenIssuerConfig {
    fn from(jwt: &JwtConfig) -> Self {
        let or_default = |value: i64, default: i64| {
            if (1..=MAX_TOKEN_TTL_SECONDS).contains(&value) {
                value
            } else {
                default
            }
        };
        Self {
            jwt_secret: jwt.secret.clone(),
            algorithm: Algorithm::HS256,
            access_ttl_seconds: or_default(jwt.access_token_expiry, ACCESS_TOKEN_TTL_SECONDS),
            refresh_ttl_seconds: or_default(jwt.refresh_token_expiry, REFRESH_TOKEN_TTL_SECONDS),
        }
    }
}

impl TokenIssuerConfig {
    /// Resolve a caller-requested access lifetime; absent or non-positive means the default
    ///
    /// Requests above `MAX_ACCESS_TOKEN_TTL_SECONDS` are rejected.
    pub fn access_ttl(&self, requested: Option<i64>) -> Result<i64, ValidationError> {
        match requested {
            Some(seconds) if seconds > MAX_ACCESS_TOKEN_TTL_SECONDS => {
                Err(ValidationError::OutOfRange {
                    field: "expire_seconds".to_string(),
                    max: MAX_ACCESS_TOKEN_TTL_SECONDS,
                })
            }
            Some(seconds) if seconds > 0 => Ok(seconds),
            _ => Ok(self.access_ttl_seconds),
        }
    }
}
