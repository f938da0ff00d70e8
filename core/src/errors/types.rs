//! Error types for authentication, tokens and request validation
//!
//! Display strings for anything a caller can see are intentionally uniform:
//! every credential failure reads "invalid credentials" and every token
//! failure reads "invalid token", whatever the underlying cause.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown phone or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is not in ACTIVE status
    #[error("user status invalid")]
    UserStatusInvalid,

    /// Registration attempted for a phone that already has an account
    #[error("phone already exists")]
    PhoneAlreadyExists,

    /// Authenticated caller lacks the required role
    #[error("insufficient permission")]
    InsufficientPermissions,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Unknown, malformed, rotated, revoked or badly signed token
    #[error("invalid token")]
    InvalidToken,

    /// Signature is fine but `exp` has passed
    #[error("invalid token")]
    Expired,

    /// An access token was presented where a refresh token is required, or vice versa
    #[error("invalid token")]
    WrongTokenType,

    /// The signing library rejected the claims or key
    #[error("token signing failed: {message}")]
    SigningFailed { message: String },
}

/// Request validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field required: {field}")]
    RequiredField { field: String },

    #[error("invalid format for field {field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("field {field} must be greater than zero")]
    MustBePositive { field: String },

    #[error("field {field} must not exceed {max}")]
    OutOfRange { field: String, max: i64 },

    #[error("{message}")]
    Rule { message: String },
}
