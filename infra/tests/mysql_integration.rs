//! Integration tests for the MySQL repositories
//!
//! These tests require a MySQL database with `migrations/0001_auth_tables.sql` applied.
//! Run with: cargo test -p sg_infra --test mysql_integration -- --ignored

use std::sync::Arc;

use chrono::{Duration, Utc};
use sg_core::domain::entities::risk::{FailurePolicy, UnlockLogFilter, UnlockRecord};
use sg_core::domain::entities::token::RefreshTokenRecord;
use sg_core::repositories::{LoginFailureRepository, RefreshTokenRepository, RiskConfigRepository};
use sg_core::services::token::hash_token;
use sg_infra::config::DatabaseConfig;
use sg_infra::database::{
    DatabasePool, MySqlLoginFailureRepository, MySqlRefreshTokenRepository,
    MySqlRiskConfigRepository,
};
use sg_shared::PageRequest;

async fn pool() -> DatabasePool {
    DatabasePool::new(&DatabaseConfig::from_env())
        .await
        .expect("MySQL must be running")
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_concurrent_rotation_has_one_winner() {
    let repo = Arc::new(MySqlRefreshTokenRepository::new(pool().await.get_pool().clone()));
    let expires_at = Utc::now() + Duration::hours(1);
    let original = RefreshTokenRecord::new("u_it", hash_token(&unique("tok")), expires_at);
    repo.create(&original).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..5 {
        let repo = Arc::clone(&repo);
        let old_id = original.id.clone();
        let successor = RefreshTokenRecord::new("u_it", hash_token(&unique(&format!("next{}", i))), expires_at);
        handles.push(tokio::spawn(async move {
            repo.rotate(&old_id, &successor, Utc::now()).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert!(repo
        .find_active(&original.token_hash, Utc::now())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_failure_counter_locks_at_threshold() {
    let repo = MySqlLoginFailureRepository::new(pool().await.get_pool().clone());
    let phone = unique("139")[..15].to_string();
    let now = Utc::now();
    let policy = FailurePolicy {
        threshold: 3,
        lock_until: now + Duration::seconds(900),
    };

    for expected in 1..=2 {
        let row = repo.record_failure(&phone, now, policy).await.unwrap();
        assert_eq!(row.fail_count, expected);
        assert!(row.locked_until.is_none());
    }
    let locked = repo.record_failure(&phone, now, policy).await.unwrap();
    assert_eq!(locked.fail_count, 3);
    assert!(locked.active_lock(now).is_some());

    let unchanged = repo.record_failure(&phone, now, policy).await.unwrap();
    assert_eq!(unchanged.fail_count, 3);

    repo.delete(&phone).await.unwrap();
    assert!(repo.find(&phone).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_unlock_log_listing_filters_and_pages() {
    let repo = MySqlRiskConfigRepository::new(pool().await.get_pool().clone());
    let operator = unique("admin_it");
    let phone = unique("138")[..15].to_string();

    for reason in ["first", "second", "third"] {
        let record = UnlockRecord::new(&operator, Some(phone.clone()), None, Some(reason.to_string()));
        repo.append_unlock(&record).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let filter = UnlockLogFilter {
        operator_user_id: Some(operator.clone()),
        ..Default::default()
    };
    let page = repo
        .list_unlocks(&filter, PageRequest::from_query(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].reason.as_deref(), Some("third"));
    assert_eq!(page.items[0].phone.as_deref(), Some(phone.as_str()));
    assert!(page.items[0].ip.is_none());

    let last = repo
        .list_unlocks(&filter, PageRequest::from_query(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].reason.as_deref(), Some("first"));
}
