//! # Infrastructure Layer
//!
//! Concrete adapters for the repository traits declared in `sg_core`:
//!
//! - **Database**: MySQL implementations using SQLx
//! - **Cache**: Redis client and the ephemeral risk counters
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

use sg_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and risk counters
pub mod cache;

/// Configuration re-exports used by the adapters
pub mod config {
    pub use sg_shared::config::{CacheConfig, DatabaseConfig};
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::database(e.to_string()),
            InfrastructureError::Cache(e) => DomainError::cache(e.to_string()),
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}
