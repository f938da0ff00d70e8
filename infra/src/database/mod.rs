//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Repository implementations for the core traits

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlAuditSink, MySqlLoginFailureRepository, MySqlPermissionResolver,
    MySqlRefreshTokenRepository, MySqlRiskConfigRepository, MySqlUserRepository,
};
