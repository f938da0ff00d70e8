//! Durable login-risk storage: the per-phone failure counter and the
//! runtime risk configuration with its change logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sg_shared::config::RiskConfig;
use sg_shared::{Page, PageRequest};

use crate::domain::entities::risk::{
    FailurePolicy, LoginFailure, RiskConfigChange, UnlockLogFilter, UnlockRecord,
};
use crate::errors::DomainError;

/// Durable per-phone failure counter
#[async_trait]
pub trait LoginFailureRepository: Send + Sync {
    /// Current counter row for a phone, if any
    async fn find(&self, phone: &str) -> Result<Option<LoginFailure>, DomainError>;

    /// Apply one failure as a single row-level atomic step
    ///
    /// Follows [`LoginFailure::apply_failure`]: an unexpired lock is returned
    /// unchanged, otherwise the count goes up and the lock is written iff the
    /// new count reaches `policy.threshold`.
    async fn record_failure(
        &self,
        phone: &str,
        now: DateTime<Utc>,
        policy: FailurePolicy,
    ) -> Result<LoginFailure, DomainError>;

    /// Remove the counter row entirely
    async fn delete(&self, phone: &str) -> Result<(), DomainError>;
}

/// Single-row runtime risk configuration
#[async_trait]
pub trait RiskConfigRepository: Send + Sync {
    /// The stored row as-is, or `None` when no row exists.
    /// Callers merge it over compiled defaults.
    async fn load(&self) -> Result<Option<RiskConfig>, DomainError>;

    /// Upsert the row
    async fn save(&self, config: &RiskConfig, updated_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Append a configuration change log entry
    async fn append_change(&self, change: &RiskConfigChange) -> Result<(), DomainError>;

    /// Append a manual unlock log entry
    async fn append_unlock(&self, record: &UnlockRecord) -> Result<(), DomainError>;

    /// Configuration change log, newest first
    async fn list_changes(&self, page: PageRequest) -> Result<Page<RiskConfigChange>, DomainError>;

    /// Unlock log matching `filter`, newest first
    async fn list_unlocks(
        &self,
        filter: &UnlockLogFilter,
        page: PageRequest,
    ) -> Result<Page<UnlockRecord>, DomainError>;
}
