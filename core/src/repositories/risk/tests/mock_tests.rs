use chrono::{Duration, Utc};

use sg_shared::config::RiskConfig;

use crate::domain::entities::risk::FailurePolicy;
use crate::repositories::risk::{
    LoginFailureRepository, MockLoginFailureRepository, MockRiskConfigRepository,
    RiskConfigRepository,
};

#[tokio::test]
async fn test_record_failure_counts_and_locks() {
    let repo = MockLoginFailureRepository::new();
    let now = Utc::now();
    let policy = FailurePolicy {
        threshold: 2,
        lock_until: now + Duration::seconds(60),
    };

    let first = repo.record_failure("138", now, policy).await.unwrap();
    assert_eq!(first.fail_count, 1);
    assert!(first.active_lock(now).is_none());

    let second = repo.record_failure("138", now, policy).await.unwrap();
    assert_eq!(second.fail_count, 2);
    assert!(second.active_lock(now).is_some());

    repo.delete("138").await.unwrap();
    assert!(repo.find("138").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_failures_are_all_counted() {
    let repo = MockLoginFailureRepository::new();
    let now = Utc::now();
    let policy = FailurePolicy {
        threshold: 100,
        lock_until: now + Duration::seconds(60),
    };

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.record_failure("138", now, policy).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.get("138").unwrap().fail_count, 10);
}

#[tokio::test]
async fn test_config_row_round_trip() {
    let repo = MockRiskConfigRepository::new();
    assert!(repo.load().await.unwrap().is_none());

    let config = RiskConfig {
        phone_fail_threshold: 3,
        ip_fail_threshold: 10,
        ip_phone_threshold: 2,
        lock_seconds: 60,
    };
    repo.save(&config, Utc::now()).await.unwrap();
    assert_eq!(repo.load().await.unwrap(), Some(config));
}
