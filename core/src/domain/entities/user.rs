//! User entity as seen by the authentication subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status value that allows login
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// Role carried in issued tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Administrative accounts are recognised by their `admin_` id prefix
    pub fn for_user_id(user_id: &str) -> Self {
        if user_id.to_lowercase().starts_with("admin_") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user row from the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub phone: String,
    pub email: Option<String>,
    /// bcrypt hash, or a legacy SHA-256 hex digest awaiting upgrade
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with a fresh `u_` id
    pub fn new(phone: impl Into<String>, email: Option<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("u_{}", Uuid::new_v4().simple()),
            phone: phone.into(),
            email: email.filter(|e| !e.trim().is_empty()),
            password_hash: password_hash.into(),
            status: STATUS_ACTIVE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(STATUS_ACTIVE)
    }

    pub fn role(&self) -> Role {
        Role::for_user_id(&self.id)
    }
}
