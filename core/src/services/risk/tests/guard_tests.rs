//! Tests for the login-risk guard

use std::sync::Arc;

use chrono::{Duration, Utc};
use sg_shared::config::RiskConfig;

use crate::domain::entities::risk::{LockType, LoginFailure};
use crate::errors::{DomainError, ErrorCategory};
use crate::repositories::risk::MockLoginFailureRepository;
use crate::services::risk::{keys, LoginRiskGuard, MockRiskCache};

const IP: &str = "1.2.3.4";
const PHONE: &str = "13800000001";

type Guard = LoginRiskGuard<MockLoginFailureRepository, MockRiskCache>;

fn setup() -> (Guard, MockLoginFailureRepository, MockRiskCache) {
    let failures = MockLoginFailureRepository::new();
    let cache = MockRiskCache::new();
    let guard = LoginRiskGuard::new(Arc::new(failures.clone()), Some(Arc::new(cache.clone())));
    (guard, failures, cache)
}

fn config(phone: i64, ip: i64, pair: i64) -> RiskConfig {
    RiskConfig {
        phone_fail_threshold: phone,
        ip_fail_threshold: ip,
        ip_phone_threshold: pair,
        lock_seconds: 900,
    }
}

#[tokio::test]
async fn test_phone_locks_exactly_at_threshold() {
    let (guard, _, _) = setup();
    let cfg = config(5, 100, 100);

    for _ in 0..4 {
        let outcome = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
        assert!(outcome.lock().is_none());
    }
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_none());

    let outcome = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    let lock = outcome.lock().unwrap();
    assert_eq!(lock.lock_type, LockType::PhoneLocked);
    assert_eq!(outcome.bad_password_reason(), "bad_password_locked");

    let expected = Utc::now() + Duration::seconds(900);
    assert!((lock.locked_until - expected).num_seconds().abs() <= 2);

    let checked = guard.check_locked(IP, PHONE, &cfg).await.unwrap().unwrap();
    assert_eq!(checked.lock_type, LockType::PhoneLocked);
}

#[tokio::test]
async fn test_phone_lock_follows_phone_across_ips() {
    let (guard, _, _) = setup();
    let cfg = config(2, 100, 100);

    guard.record_failure("10.0.0.1", PHONE, &cfg).await.unwrap();
    guard.record_failure("10.0.0.2", PHONE, &cfg).await.unwrap();

    let lock = guard.check_locked("10.0.0.3", PHONE, &cfg).await.unwrap().unwrap();
    assert_eq!(lock.lock_type, LockType::PhoneLocked);
}

#[tokio::test]
async fn test_failure_during_phone_lock_leaves_row_unchanged() {
    let (guard, failures, _) = setup();
    let cfg = config(1, 100, 100);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    let locked = failures.get(PHONE).unwrap();

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert_eq!(failures.get(PHONE).unwrap(), locked);
}

#[tokio::test]
async fn test_ip_phone_lock_takes_precedence() {
    let (guard, _, cache) = setup();
    let cfg = config(100, 3, 3);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    let outcome = guard.record_failure(IP, PHONE, &cfg).await.unwrap();

    assert_eq!(outcome.lock().unwrap().lock_type, LockType::IpPhoneLocked);
    assert_eq!(outcome.bad_password_reason(), "ip_phone_locked");
    assert!(cache.contains(&keys::lock_ip(IP)));

    let checked = guard.check_locked(IP, PHONE, &cfg).await.unwrap().unwrap();
    assert_eq!(checked.lock_type, LockType::IpPhoneLocked);
}

#[tokio::test]
async fn test_ip_lock_spans_phones() {
    let (guard, _, _) = setup();
    let cfg = config(100, 20, 100);

    for i in 0..20 {
        let phone = format!("1380000{:04}", i);
        guard.record_failure(IP, &phone, &cfg).await.unwrap();
    }

    let lock = guard
        .check_locked(IP, "13999999999", &cfg)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lock.lock_type, LockType::IpLocked);
    assert!(guard
        .check_locked("5.6.7.8", "13999999999", &cfg)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_counter_window_is_fixed_from_first_failure() {
    let (guard, _, cache) = setup();
    let cfg = config(100, 100, 100);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    let first_expiry = cache.expires_at(&keys::fail_ip(IP)).unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();

    assert_eq!(cache.expires_at(&keys::fail_ip(IP)), Some(first_expiry));
    assert_eq!(cache.value(&keys::fail_ip(IP)).as_deref(), Some("2"));
}

#[tokio::test]
async fn test_ephemeral_lock_lifts_after_window() {
    let (guard, _, cache) = setup();
    let cfg = config(100, 100, 1);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_some());

    cache.expire_until(Utc::now() + Duration::seconds(901));
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_none());
}

#[tokio::test]
async fn test_clear_keeps_bare_ip_counter() {
    let (guard, failures, cache) = setup();
    let cfg = config(100, 100, 100);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    guard.clear(IP, PHONE).await.unwrap();

    assert!(failures.get(PHONE).is_none());
    assert!(!cache.contains(&keys::fail_ip_phone(IP, PHONE)));
    assert!(cache.contains(&keys::fail_ip(IP)));
}

#[tokio::test]
async fn test_clear_restarts_phone_sequence() {
    let (guard, _, _) = setup();
    let cfg = config(3, 100, 100);

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    guard.clear(IP, PHONE).await.unwrap();

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_none());

    guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_some());
}

#[tokio::test]
async fn test_cache_outage_degrades_recording() {
    let (guard, failures, cache) = setup();
    cache.set_unavailable(true);
    let cfg = config(2, 1, 1);

    let first = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert!(first.ephemeral_lock.is_none());
    let second = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert_eq!(second.lock().unwrap().lock_type, LockType::PhoneLocked);
    assert_eq!(failures.get(PHONE).unwrap().fail_count, 2);

    guard.clear(IP, PHONE).await.unwrap();
}

#[tokio::test]
async fn test_cache_outage_fails_closed_on_check() {
    let (guard, _, cache) = setup();
    cache.set_unavailable(true);

    let err = guard
        .check_locked(IP, PHONE, &RiskConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DependencyUnavailable);
}

#[tokio::test]
async fn test_database_outage_fails_closed() {
    let (guard, failures, _) = setup();
    failures.set_unavailable(true);
    let cfg = RiskConfig::default();

    assert!(matches!(
        guard.check_locked(IP, PHONE, &cfg).await,
        Err(DomainError::DependencyUnavailable { .. })
    ));
    assert!(guard.record_failure(IP, PHONE, &cfg).await.is_err());
}

#[tokio::test]
async fn test_malformed_marker_counts_as_locked() {
    let (guard, _, cache) = setup();
    cache.put(&keys::lock_ip(IP), "garbage");

    let lock = guard
        .check_locked(IP, PHONE, &RiskConfig::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lock.lock_type, LockType::IpLocked);
    assert!(lock.locked_until > Utc::now());
}

#[tokio::test]
async fn test_without_cache_only_phone_dimension_applies() {
    let failures = MockLoginFailureRepository::new();
    let guard: Guard = LoginRiskGuard::new(Arc::new(failures.clone()), None);
    let cfg = config(2, 1, 1);

    let first = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert!(first.lock().is_none());
    let second = guard.record_failure(IP, PHONE, &cfg).await.unwrap();
    assert_eq!(second.lock().unwrap().lock_type, LockType::PhoneLocked);
}

#[tokio::test]
async fn test_expired_phone_lock_is_ignored() {
    let (guard, failures, _) = setup();
    failures.put(LoginFailure {
        phone: PHONE.to_string(),
        fail_count: 5,
        locked_until: Some(Utc::now() - Duration::seconds(5)),
        updated_at: Utc::now(),
    });

    assert!(guard
        .check_locked(IP, PHONE, &RiskConfig::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_release_removes_requested_dimensions() {
    let (guard, failures, cache) = setup();
    let cfg = config(1, 1, 1);
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();

    guard.release(Some(PHONE), Some(IP)).await.unwrap();

    assert!(failures.get(PHONE).is_none());
    for key in keys::ip_keys(IP).iter().chain(keys::ip_phone_keys(IP, PHONE).iter()) {
        assert!(!cache.contains(key), "{} survived", key);
    }
    assert!(guard.check_locked(IP, PHONE, &cfg).await.unwrap().is_none());
}

#[tokio::test]
async fn test_release_ip_only_keeps_pair_keys() {
    let (guard, _, cache) = setup();
    let cfg = config(100, 1, 1);
    guard.record_failure(IP, PHONE, &cfg).await.unwrap();

    guard.release(None, Some(IP)).await.unwrap();

    assert!(!cache.contains(&keys::lock_ip(IP)));
    assert!(cache.contains(&keys::lock_ip_phone(IP, PHONE)));
}

#[tokio::test]
async fn test_release_propagates_cache_errors() {
    let (guard, _, cache) = setup();
    cache.set_unavailable(true);
    assert!(guard.release(None, Some(IP)).await.is_err());
}

#[tokio::test]
async fn test_unrepresentable_lock_is_an_error_not_a_panic() {
    let (guard, failures, _) = setup();
    let cfg = RiskConfig {
        lock_seconds: 10_000_000_000_000,
        ..config(5, 100, 100)
    };

    let err = guard.record_failure(IP, PHONE, &cfg).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
    assert_eq!(err.category(), ErrorCategory::Internal);
    assert!(failures.get(PHONE).is_none());
}

#[tokio::test]
async fn test_garbled_marker_with_unrepresentable_lock_is_an_error() {
    let (guard, _, cache) = setup();
    cache.put(&keys::lock_ip(IP), "not-a-timestamp");
    let cfg = RiskConfig {
        lock_seconds: i64::MAX,
        ..config(5, 100, 100)
    };

    let err = guard.check_locked(IP, PHONE, &cfg).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
}
