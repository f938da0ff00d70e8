//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::{DomainError, TokenError};

use super::r#trait::RefreshTokenRepository;

/// In-memory refresh token store keyed by record id
#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the database were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored record, for assertions
    pub async fn all(&self) -> Vec<RefreshTokenRecord> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Option<RefreshTokenRecord> {
        self.records
            .read()
            .await
            .values()
            .find(|r| r.token_hash == token_hash)
            .cloned()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("mock refresh token store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<String, DomainError> {
        self.check()?;
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record.clone());
        Ok(record.id.clone())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.token_hash == token_hash && r.is_active(now))
            .cloned())
    }

    async fn rotate(
        &self,
        old_id: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        self.check()?;
        // The write guard makes check-and-set one step, like the conditional UPDATE
        let mut records = self.records.write().await;
        match records.get_mut(old_id) {
            Some(old) if !old.revoked => old.rotate_into(successor.id.clone(), now),
            _ => return Err(TokenError::InvalidToken.into()),
        }
        records.insert(successor.id.clone(), successor.clone());
        Ok(successor.id.clone())
    }

    async fn revoke(&self, id: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        self.check()?;
        let mut records = self.records.write().await;
        match records.get_mut(id) {
            Some(record) if !record.revoked => {
                record.revoke(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all(&self, user_id: &str, now: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check()?;
        let mut records = self.records.write().await;
        let mut count = 0;
        for record in records.values_mut() {
            if record.user_id == user_id && !record.revoked {
                record.revoke(now);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check()?;
        let mut records = self.records.write().await;
        let initial = records.len();
        records.retain(|_, r| r.expires_at >= before);
        Ok((initial - records.len()) as u64)
    }
}
