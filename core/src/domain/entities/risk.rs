//! Login-risk entities: lock types, the durable per-phone counter and the
//! admin change logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sg_shared::config::RiskConfig;

/// Which risk dimension produced a lock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    /// Ephemeral lock on one IP+phone pair
    IpPhoneLocked,
    /// Ephemeral lock on a source IP
    IpLocked,
    /// Durable lock on a phone
    PhoneLocked,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::IpPhoneLocked => "ip_phone_locked",
            LockType::IpLocked => "ip_locked",
            LockType::PhoneLocked => "phone_locked",
        }
    }
}

impl std::fmt::Display for LockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active lock and when it lifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub lock_type: LockType,
    pub locked_until: DateTime<Utc>,
}

impl LockStatus {
    pub fn new(lock_type: LockType, locked_until: DateTime<Utc>) -> Self {
        Self { lock_type, locked_until }
    }
}

/// Durable failure counter row keyed by phone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginFailure {
    pub phone: String,
    pub fail_count: i64,
    pub locked_until: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl LoginFailure {
    /// The lock, if it is still in force at `now`
    pub fn active_lock(&self, now: DateTime<Utc>) -> Option<LockStatus> {
        self.locked_until
            .filter(|until| *until > now)
            .map(|until| LockStatus::new(LockType::PhoneLocked, until))
    }
}

/// Parameters for one durable failure increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailurePolicy {
    /// Inclusive count at which the phone locks
    pub threshold: i64,
    /// Lock expiry to write if this increment reaches the threshold
    pub lock_until: DateTime<Utc>,
}

impl LoginFailure {
    /// Apply one failure at `now`.
    ///
    /// An unexpired lock leaves the row untouched. Otherwise the count is
    /// incremented and the lock is set iff the new count reaches the threshold.
    pub fn apply_failure(existing: Option<LoginFailure>, phone: &str, now: DateTime<Utc>, policy: FailurePolicy) -> LoginFailure {
        let mut row = existing.unwrap_or_else(|| LoginFailure {
            phone: phone.to_string(),
            fail_count: 0,
            locked_until: None,
            updated_at: now,
        });
        if row.active_lock(now).is_some() {
            return row;
        }
        row.fail_count += 1;
        row.locked_until = if row.fail_count >= policy.threshold {
            Some(policy.lock_until)
        } else {
            None
        };
        row.updated_at = now;
        row
    }
}

/// Audit entry for a risk configuration change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskConfigChange {
    pub id: String,
    pub operator_user_id: String,
    pub old_config: RiskConfig,
    pub new_config: RiskConfig,
    pub created_at: DateTime<Utc>,
}

impl RiskConfigChange {
    pub fn new(operator_user_id: impl Into<String>, old_config: RiskConfig, new_config: RiskConfig) -> Self {
        Self {
            id: format!("arcl_{}", Uuid::new_v4().simple()),
            operator_user_id: operator_user_id.into(),
            old_config,
            new_config,
            created_at: Utc::now(),
        }
    }
}

/// Audit entry for a manual unlock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnlockRecord {
    pub id: String,
    pub operator_user_id: String,
    pub phone: Option<String>,
    pub ip: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UnlockRecord {
    pub fn new(
        operator_user_id: impl Into<String>,
        phone: Option<String>,
        ip: Option<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: format!("aul_{}", Uuid::new_v4().simple()),
            operator_user_id: operator_user_id.into(),
            phone,
            ip,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Optional exact-match filters for the unlock log listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockLogFilter {
    pub phone: Option<String>,
    pub ip: Option<String>,
    pub operator_user_id: Option<String>,
}

impl UnlockLogFilter {
    /// Drop blank values so they do not filter
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            phone: clean(self.phone),
            ip: clean(self.ip),
            operator_user_id: clean(self.operator_user_id),
        }
    }

    pub fn matches(&self, record: &UnlockRecord) -> bool {
        fn accepts(filter: &Option<String>, value: Option<&str>) -> bool {
            filter.as_deref().map_or(true, |wanted| value == Some(wanted))
        }
        accepts(&self.phone, record.phone.as_deref())
            && accepts(&self.ip, record.ip.as_deref())
            && accepts(&self.operator_user_id, Some(&record.operator_user_id))
    }
}
