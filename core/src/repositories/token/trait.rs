//! Refresh token store: durable record of refresh-token hashes and their
//! rotation/revocation state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence
///
/// Only the SHA-256 hex digest of a token string ever reaches an
/// implementation. Rotated, revoked and expired records are
/// indistinguishable through [`find_active`](Self::find_active).
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new active record
    ///
    /// # Returns
    /// * `Ok(String)` - The id of the stored record
    /// * `Err(DomainError)` - Storage failed
    async fn create(&self, record: &RefreshTokenRecord) -> Result<String, DomainError>;

    /// Find the record for `token_hash` if it is still active at `now`
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Not revoked and not expired
    /// * `Ok(None)` - Unknown, rotated, revoked or expired
    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Atomically insert `successor` and mark `old_id` rotated into it
    ///
    /// Exactly one of any number of concurrent calls for the same `old_id`
    /// succeeds. The losers get `TokenError::InvalidToken` and leave no
    /// successor row behind.
    ///
    /// # Returns
    /// * `Ok(String)` - The id of the successor
    /// * `Err(DomainError::Token(InvalidToken))` - `old_id` was no longer active
    async fn rotate(
        &self,
        old_id: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError>;

    /// Revoke a single record without a successor
    ///
    /// # Returns
    /// * `Ok(true)` - A non-revoked record was revoked
    /// * `Ok(false)` - Unknown or already revoked
    async fn revoke(&self, id: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke every non-revoked record for a user, returning how many changed
    async fn revoke_all(&self, user_id: &str, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Delete records whose expiry is before `before`
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;
}
