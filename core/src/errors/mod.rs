//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError, ValidationError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::risk::LockType;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// An active login lock; safe to expose because it is not a credential oracle
    #[error("too many failed attempts ({lock_type}) until {locked_until}")]
    RateLimited {
        lock_type: LockType,
        locked_until: DateTime<Utc>,
    },

    /// A backing store could not be reached or timed out
    #[error("{dependency} unavailable: {message}")]
    DependencyUnavailable { dependency: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

/// Coarse error category, one per HTTP status family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authentication,
    Forbidden,
    Conflict,
    NotFound,
    RateLimited,
    DependencyUnavailable,
    Internal,
}

impl DomainError {
    /// Shorthand for a database outage
    pub fn database(message: impl Into<String>) -> Self {
        DomainError::DependencyUnavailable {
            dependency: "database".to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a cache outage
    pub fn cache(message: impl Into<String>) -> Self {
        DomainError::DependencyUnavailable {
            dependency: "cache".to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::ValidationErr(_) => ErrorCategory::Validation,
            DomainError::NotFound { .. } => ErrorCategory::NotFound,
            DomainError::RateLimited { .. } => ErrorCategory::RateLimited,
            DomainError::DependencyUnavailable { .. } => ErrorCategory::DependencyUnavailable,
            DomainError::Internal { .. } => ErrorCategory::Internal,
            DomainError::Auth(err) => match err {
                AuthError::InvalidCredentials => ErrorCategory::Authentication,
                AuthError::UserStatusInvalid | AuthError::InsufficientPermissions => {
                    ErrorCategory::Forbidden
                }
                AuthError::PhoneAlreadyExists => ErrorCategory::Conflict,
            },
            DomainError::Token(err) => match err {
                TokenError::SigningFailed { .. } => ErrorCategory::Internal,
                _ => ErrorCategory::Authentication,
            },
        }
    }

    /// True for the "invalid token" family
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            DomainError::Token(TokenError::InvalidToken)
                | DomainError::Token(TokenError::Expired)
                | DomainError::Token(TokenError::WrongTokenType)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
