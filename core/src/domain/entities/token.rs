//! Token entities: JWT claims and the durable refresh-token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Default access token lifetime in seconds (1 day)
pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Default refresh token lifetime in seconds (7 days)
pub const REFRESH_TOKEN_TTL_SECONDS: i64 = 604_800;

/// Longest access token lifetime a caller may request (30 days)
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 2_592_000;

/// Longest lifetime any signed token may carry (1 year)
pub const MAX_TOKEN_TTL_SECONDS: i64 = 31_536_000;

/// Token type marker carried inside the claims
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "ACCESS",
            TokenType::Refresh => "REFRESH",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims shared by access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    pub uid: String,
    /// Resolved role (`ADMIN` / `USER`)
    pub role: String,
    /// Whether this is an access or a refresh token
    pub token_type: TokenType,
    /// Subject, always equal to `uid`
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// Build claims valid from `now` for exactly `ttl_seconds`
    ///
    /// `ttl_seconds` must lie in `1..=MAX_TOKEN_TTL_SECONDS`.
    pub fn new(
        user_id: impl Into<String>,
        role: impl Into<String>,
        token_type: TokenType,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if ttl_seconds <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "ttl_seconds".to_string(),
            });
        }
        let iat = now.timestamp();
        let exp = iat
            .checked_add(ttl_seconds)
            .filter(|_| ttl_seconds <= MAX_TOKEN_TTL_SECONDS)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "ttl_seconds".to_string(),
                max: MAX_TOKEN_TTL_SECONDS,
            })?;

        let uid = user_id.into();
        Ok(Self {
            sub: uid.clone(),
            uid,
            role: role.into(),
            token_type,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Lifetime encoded in the claims
    pub fn ttl_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}

/// Observable state of a refresh token record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    /// Used once to mint a successor
    Rotated,
    /// Revoked by logout / logout-all
    Revoked,
    /// Past `expires_at`, no write involved
    Expired,
}

/// Durable refresh token record. Only the SHA-256 hex of the token string is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Create a new active record with a fresh `rt_` id
    pub fn new(user_id: impl Into<String>, token_hash: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("rt_{}", Uuid::new_v4().simple()),
            user_id: user_id.into(),
            token_hash: token_hash.into(),
            expires_at,
            revoked: false,
            revoked_at: None,
            replaced_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn state(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked {
            if self.replaced_by.is_some() {
                RefreshTokenState::Rotated
            } else {
                RefreshTokenState::Revoked
            }
        } else if now >= self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == RefreshTokenState::Active
    }

    /// Mark as rotated into `successor_id`
    pub fn rotate_into(&mut self, successor_id: impl Into<String>, now: DateTime<Utc>) {
        self.revoked = true;
        self.revoked_at = Some(now);
        self.replaced_by = Some(successor_id.into());
    }

    /// Mark as revoked without a successor
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        self.revoked = true;
        self.revoked_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_ttl_invariant() {
        let now = Utc::now();
        let claims = Claims::new("u_1", "USER", TokenType::Access, 3600, now).unwrap();
        assert_eq!(claims.ttl_seconds(), 3600);
        assert_eq!(claims.sub, claims.uid);
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn test_claims_reject_unrepresentable_lifetimes() {
        let now = Utc::now();

        let err = Claims::new("u_1", "USER", TokenType::Access, i64::MAX, now).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "ttl_seconds".to_string(),
                max: MAX_TOKEN_TTL_SECONDS,
            }
        );

        let err = Claims::new("u_1", "USER", TokenType::Access, MAX_TOKEN_TTL_SECONDS + 1, now)
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        let err = Claims::new("u_1", "USER", TokenType::Access, 0, now).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));

        let longest = Claims::new("u_1", "USER", TokenType::Refresh, MAX_TOKEN_TTL_SECONDS, now).unwrap();
        assert_eq!(longest.ttl_seconds(), MAX_TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_token_type_wire_format() {
        let json = serde_json::to_string(&TokenType::Refresh).unwrap();
        assert_eq!(json, "\"REFRESH\"");
        let parsed: TokenType = serde_json::from_str("\"ACCESS\"").unwrap();
        assert_eq!(parsed, TokenType::Access);
    }

    #[test]
    fn test_record_state_machine() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::new("u_1", "hash", now + Duration::hours(1));
        assert_eq!(record.state(now), RefreshTokenState::Active);
        assert_eq!(record.state(now + Duration::hours(2)), RefreshTokenState::Expired);

        let mut revoked = record.clone();
        revoked.revoke(now);
        assert_eq!(revoked.state(now), RefreshTokenState::Revoked);

        record.rotate_into("rt_next", now);
        assert_eq!(record.state(now), RefreshTokenState::Rotated);
        assert!(!record.is_active(now));
    }
}
