//! # SessionGuard Core
//!
//! Domain layer for session issuance and login-risk control.
//! This crate contains domain entities, services, repository interfaces,
//! and error types. It has no knowledge of HTTP, MySQL or Redis.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{AccessProfile, AuditEvent, Claims, LockStatus, LockType, Role, User};
pub use domain::value_objects::{AuthResponse, RequestContext};
pub use errors::{DomainError, DomainResult, ErrorCategory};
