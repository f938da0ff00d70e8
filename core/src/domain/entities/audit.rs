//! Audit event entity for the login log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Auditable authentication actions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Register,
    Login,
    Refresh,
    Logout,
    LogoutAll,
}

impl AuditAction {
    /// Convert to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Login => "LOGIN",
            Self::Refresh => "REFRESH",
            Self::Logout => "LOGOUT",
            Self::LogoutAll => "LOGOUT_ALL",
        }
    }
}

/// Outcome of an audited action
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

/// Failure reasons written to the log
pub mod reasons {
    pub const USER_NOT_FOUND: &str = "user_not_found";
    pub const STATUS_NOT_ACTIVE: &str = "status_not_active";
    pub const BAD_PASSWORD: &str = "bad_password";
    pub const BAD_PASSWORD_LOCKED: &str = "bad_password_locked";
}

/// One row of the login log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: String,

    /// Empty when the user could not be resolved
    pub user_id: String,

    /// Empty for token-only actions
    pub phone: String,

    pub action: AuditAction,
    pub status: AuditStatus,

    /// Machine-readable failure reason, empty on success
    pub reason: String,

    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, status: AuditStatus) -> Self {
        Self {
            id: format!("al_{}", Uuid::new_v4().simple()),
            user_id: String::new(),
            phone: String::new(),
            action,
            status,
            reason: String::new(),
            ip: String::new(),
            user_agent: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn success(action: AuditAction) -> Self {
        Self::new(action, AuditStatus::Success)
    }

    pub fn failed(action: AuditAction, reason: impl Into<String>) -> Self {
        Self::new(action, AuditStatus::Failed).with_reason(reason)
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Attach the caller's network context
    pub fn with_client(mut self, ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        self.ip = ip.into();
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_storage_names() {
        assert_eq!(AuditAction::LogoutAll.as_str(), "LOGOUT_ALL");
        assert_eq!(
            serde_json::to_string(&AuditAction::LogoutAll).unwrap(),
            "\"LOGOUT_ALL\""
        );
        assert_eq!(AuditStatus::Failed.as_str(), "FAILED");
    }

    #[test]
    fn test_builder_fills_fields() {
        let event = AuditEvent::failed(AuditAction::Login, reasons::BAD_PASSWORD)
            .with_user("u_1")
            .with_phone("13800000001")
            .with_client("10.0.0.1", "curl/8");

        assert!(event.id.starts_with("al_"));
        assert_eq!(event.status, AuditStatus::Failed);
        assert_eq!(event.reason, "bad_password");
        assert_eq!(event.ip, "10.0.0.1");
        assert_eq!(event.user_agent, "curl/8");
    }
}
