//! Shared configuration and wire types for the SessionGuard server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The error body returned by every endpoint
//! - Phone number helpers
//! - Pagination for list endpoints

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    RiskConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse, LockedResponse};
pub use types::{Page, PageRequest};

pub use utils::{is_valid_phone, mask_phone_number};
