//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::Role;

pub const BEARER: &str = "Bearer";

/// Token pair plus caller metadata, returned by login, register and refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token, single-use
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    pub user_id: String,

    pub role: Role,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user_id: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
            expires_in,
            user_id: user_id.into(),
            role,
        }
    }
}
