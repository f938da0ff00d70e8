//! Dual-store brute-force lockout decisions

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sg_shared::config::RiskConfig;
use sg_shared::mask_phone_number;
use tracing::{debug, info, warn};

use crate::domain::entities::audit::reasons;
use crate::domain::entities::risk::{FailurePolicy, LockStatus, LockType};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::LoginFailureRepository;

use super::keys;
use super::traits::RiskCache;

/// Locks produced by one recorded failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureOutcome {
    /// ip+phone or ip lock from the cache, ip+phone preferred
    pub ephemeral_lock: Option<LockStatus>,
    /// Durable phone lock in force after the increment
    pub phone_lock: Option<LockStatus>,
}

impl FailureOutcome {
    /// The lock to report, using the same precedence as `check_locked`
    pub fn lock(&self) -> Option<LockStatus> {
        self.ephemeral_lock.or(self.phone_lock)
    }

    /// Audit reason for a wrong password
    pub fn bad_password_reason(&self) -> &'static str {
        match (self.ephemeral_lock, self.phone_lock) {
            (Some(lock), _) => lock.lock_type.as_str(),
            (None, Some(_)) => reasons::BAD_PASSWORD_LOCKED,
            (None, None) => reasons::BAD_PASSWORD,
        }
    }
}

/// Blends the durable per-phone counter with the ephemeral ip and
/// ip+phone counters.
///
/// The cache is optional. Without it only the phone dimension is enforced.
pub struct LoginRiskGuard<F, C>
where
    F: LoginFailureRepository,
    C: RiskCache,
{
    failures: Arc<F>,
    cache: Option<Arc<C>>,
}

impl<F, C> LoginRiskGuard<F, C>
where
    F: LoginFailureRepository,
    C: RiskCache,
{
    pub fn new(failures: Arc<F>, cache: Option<Arc<C>>) -> Self {
        Self { failures, cache }
    }

    /// Find the first active lock: ip+phone, then ip, then phone.
    ///
    /// Any store error fails closed.
    pub async fn check_locked(
        &self,
        ip: &str,
        phone: &str,
        config: &RiskConfig,
    ) -> DomainResult<Option<LockStatus>> {
        let now = Utc::now();

        if let (Some(cache), false) = (&self.cache, ip.is_empty()) {
            let candidates = [
                (keys::lock_ip_phone(ip, phone), LockType::IpPhoneLocked),
                (keys::lock_ip(ip), LockType::IpLocked),
            ];
            for (key, lock_type) in candidates {
                let marker = cache.get(&key).await.map_err(DomainError::cache)?;
                if let Some(value) = marker.filter(|v| !v.is_empty()) {
                    let locked_until = parse_marker(&value, now, config.lock_seconds)?;
                    return Ok(Some(LockStatus::new(lock_type, locked_until)));
                }
            }
        }

        let row = self.failures.find(phone).await?;
        Ok(row.and_then(|r| r.active_lock(now)))
    }

    /// Count one failed attempt in every dimension
    ///
    /// The durable increment must succeed. Cache errors are logged and the
    /// ephemeral dimensions are skipped for this attempt.
    pub async fn record_failure(
        &self,
        ip: &str,
        phone: &str,
        config: &RiskConfig,
    ) -> DomainResult<FailureOutcome> {
        let now = Utc::now();
        let lock_until = lock_deadline(now, config.lock_seconds)?;

        let row = self
            .failures
            .record_failure(
                phone,
                now,
                FailurePolicy {
                    threshold: config.phone_fail_threshold,
                    lock_until,
                },
            )
            .await?;
        let phone_lock = row.active_lock(now);

        let ephemeral_lock = match self.record_ephemeral(ip, phone, config, lock_until).await {
            Ok(lock) => lock,
            Err(e) => {
                warn!(error = %e, "Risk cache unavailable, recording failure durably only");
                None
            }
        };

        let outcome = FailureOutcome {
            ephemeral_lock,
            phone_lock,
        };
        if let Some(lock) = outcome.lock() {
            info!(
                phone = %mask_phone_number(phone),
                ip = ip,
                lock_type = lock.lock_type.as_str(),
                locked_until = %lock.locked_until,
                "Login locked"
            );
        } else {
            debug!(phone = %mask_phone_number(phone), fail_count = row.fail_count, "Login failure recorded");
        }
        Ok(outcome)
    }

    async fn record_ephemeral(
        &self,
        ip: &str,
        phone: &str,
        config: &RiskConfig,
        lock_until: DateTime<Utc>,
    ) -> Result<Option<LockStatus>, String> {
        let cache = match (&self.cache, ip.is_empty()) {
            (Some(cache), false) => cache,
            _ => return Ok(None),
        };
        let window = config.lock_seconds;
        let marker = lock_until.to_rfc3339();

        let ip_count = cache.incr_with_window(&keys::fail_ip(ip), window).await?;
        let pair_count = cache
            .incr_with_window(&keys::fail_ip_phone(ip, phone), window)
            .await?;

        let mut lock = None;
        if pair_count >= config.ip_phone_threshold {
            cache
                .set_marker(&keys::lock_ip_phone(ip, phone), &marker, window)
                .await?;
            lock = Some(LockStatus::new(LockType::IpPhoneLocked, lock_until));
        }
        if ip_count >= config.ip_fail_threshold {
            cache.set_marker(&keys::lock_ip(ip), &marker, window).await?;
            lock = lock.or(Some(LockStatus::new(LockType::IpLocked, lock_until)));
        }
        Ok(lock)
    }

    /// Forget the phone counter and the ip+phone pair after a successful login.
    /// The bare ip counter is left alone.
    ///
    /// Only a durable error is returned.
    pub async fn clear(&self, ip: &str, phone: &str) -> DomainResult<()> {
        if let (Some(cache), false) = (&self.cache, ip.is_empty()) {
            if let Err(e) = cache.delete(&keys::ip_phone_keys(ip, phone)).await {
                warn!(error = %e, "Failed to clear ip+phone risk keys");
            }
        }
        self.failures.delete(phone).await
    }

    /// Administrative unlock. Every store error is returned.
    pub async fn release(&self, phone: Option<&str>, ip: Option<&str>) -> DomainResult<()> {
        if let Some(phone) = phone {
            self.failures.delete(phone).await?;
        }

        let Some(cache) = &self.cache else {
            return Ok(());
        };
        let mut doomed = Vec::new();
        if let Some(ip) = ip {
            doomed.extend(keys::ip_keys(ip));
            if let Some(phone) = phone {
                doomed.extend(keys::ip_phone_keys(ip, phone));
            }
        }
        if !doomed.is_empty() {
            cache.delete(&doomed).await.map_err(DomainError::cache)?;
        }
        Ok(())
    }
}

/// Marker values are RFC 3339 expiry timestamps. Anything unreadable is
/// treated as a fresh lock.
fn parse_marker(value: &str, now: DateTime<Utc>, lock_seconds: i64) -> DomainResult<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(t) => Ok(t.with_timezone(&Utc)),
        Err(_) => lock_deadline(now, lock_seconds),
    }
}

/// `now + lock_seconds`, or `Internal` when the sum is not a representable instant
fn lock_deadline(now: DateTime<Utc>, lock_seconds: i64) -> DomainResult<DateTime<Utc>> {
    Duration::try_seconds(lock_seconds)
        .and_then(|lock| now.checked_add_signed(lock))
        .ok_or_else(|| DomainError::Internal {
            message: format!("lock_seconds {} overflows the lock deadline", lock_seconds),
        })
}
