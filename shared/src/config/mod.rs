//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing secret and token lifetimes
//! - `cache` - Redis connection for the ephemeral risk counters
//! - `database` - MySQL connection pool
//! - `environment` - Environment detection and logging configuration
//! - `risk` - Brute-force lockout thresholds
//! - `server` - HTTP server settings and request timeout

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod risk;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use risk::RiskConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Compiled/env fallback for the login-risk thresholds
    pub risk: RiskConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
            risk: RiskConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
