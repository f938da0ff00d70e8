//! Role and permission view of a user.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleBrief {
    pub code: String,
    pub name: String,
}

/// Roles and de-duplicated permission codes granted to one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessProfile {
    pub user_id: String,
    pub roles: Vec<RoleBrief>,
    pub permission_codes: Vec<String>,
}

impl AccessProfile {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.permission_codes.iter().any(|p| p == code)
    }
}
