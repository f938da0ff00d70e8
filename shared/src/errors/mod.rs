//! Shared error body and error codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Body returned while a login lock is active
///
/// `locked_until` and `lock_type` sit at the top level so clients can read
/// them without digging into `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedResponse {
    pub error: String,
    pub message: String,
    pub locked_until: DateTime<Utc>,
    pub lock_type: String,
    pub timestamp: DateTime<Utc>,
}

impl LockedResponse {
    pub fn new(lock_type: impl Into<String>, locked_until: DateTime<Utc>) -> Self {
        Self {
            error: error_codes::TOO_MANY_FAILED_ATTEMPTS.to_string(),
            message: "too many failed attempts".to_string(),
            locked_until,
            lock_type: lock_type.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const USER_STATUS_INVALID: &str = "USER_STATUS_INVALID";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const PHONE_EXISTS: &str = "PHONE_EXISTS";
    pub const TOO_MANY_FAILED_ATTEMPTS: &str = "TOO_MANY_FAILED_ATTEMPTS";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_detail() {
        let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "bad input")
            .add_detail("field", "phone");
        let details = response.details.expect("details set");
        assert_eq!(details.get("field"), Some(&serde_json::json!("phone")));
    }

    #[test]
    fn test_locked_response_shape() {
        let until = Utc::now();
        let body = serde_json::to_value(LockedResponse::new("ip_locked", until)).unwrap();
        assert_eq!(body["lock_type"], "ip_locked");
        assert_eq!(body["error"], error_codes::TOO_MANY_FAILED_ATTEMPTS);
        assert!(body.get("locked_until").is_some());
    }
}
