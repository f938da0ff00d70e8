//! Unit tests for the authentication service

use std::sync::Arc;

use chrono::Utc;
use sg_shared::config::RiskConfig;

use super::mocks::{ctx, Fixture, PASSWORD};
use crate::domain::entities::audit::{reasons, AuditAction, AuditStatus};
use crate::domain::entities::risk::LockType;
use crate::domain::entities::token::TokenType;
use crate::domain::entities::user::Role;
use crate::errors::{AuthError, DomainError, ErrorCategory, TokenError, ValidationError};
use crate::repositories::RiskConfigRepository;
use crate::services::auth::AuthServiceConfig;
use crate::services::password::legacy_digest;
use crate::services::risk::keys;
use crate::services::token::hash_token;

const PHONE: &str = "13800000001";
const IP: &str = "10.0.0.1";

fn lock_type(err: &DomainError) -> Option<LockType> {
    match err {
        DomainError::RateLimited { lock_type, .. } => Some(*lock_type),
        _ => None,
    }
}

#[tokio::test]
async fn test_login_success_issues_pair() {
    let fx = Fixture::new();
    let user = fx.seed_user(PHONE).await;

    let response = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    assert_eq!(response.user_id, user.id);
    assert_eq!(response.role, Role::User);
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 86_400);

    let claims = fx.issuer.verify_access_token(&response.access_token).unwrap();
    assert_eq!(claims.uid, user.id);
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.ttl_seconds(), 86_400);

    let stored = fx
        .tokens
        .find_by_hash(&hash_token(&response.refresh_token))
        .await
        .expect("refresh token persisted");
    assert_eq!(stored.user_id, user.id);
    assert!(stored.is_active(Utc::now()));
}

#[tokio::test]
async fn test_unknown_phone_still_pays_for_a_bcrypt_check() {
    let fx = Fixture::new();
    assert!(!fx.verifier.dummy_checked());

    let err = fx
        .service
        .login("13900000009", "whatever", None, &ctx(IP))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    assert!(fx.verifier.dummy_checked());
}

#[tokio::test]
async fn test_login_honours_requested_expiry() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;

    let short = fx
        .service
        .login(PHONE, PASSWORD, Some(120), &ctx(IP))
        .await
        .unwrap();
    assert_eq!(short.expires_in, 120);
    let claims = fx.issuer.verify_access_token(&short.access_token).unwrap();
    assert_eq!(claims.ttl_seconds(), 120);

    let fallback = fx
        .service
        .login(PHONE, PASSWORD, Some(0), &ctx(IP))
        .await
        .unwrap();
    assert_eq!(fallback.expires_in, 86_400);
}

#[tokio::test]
async fn test_login_rejects_unbounded_expiry_before_any_lookup() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;

    let err = fx
        .service
        .login(PHONE, PASSWORD, Some(i64::MAX), &ctx(IP))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::OutOfRange { ref field, .. }) if field == "expire_seconds"
    ));
    assert_eq!(fx.users.lookup_count(), 0);
    assert!(fx.failures.get(PHONE).is_none());
    assert!(fx.tokens.all().await.is_empty());
}

#[tokio::test]
async fn test_admin_prefix_yields_admin_role() {
    let fx = Fixture::new();
    fx.seed_user_with_id("admin_root", PHONE).await;

    let response = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    assert_eq!(response.role, Role::Admin);
    let claims = fx.issuer.verify_access_token(&response.access_token).unwrap();
    assert_eq!(claims.role, "ADMIN");
}

#[tokio::test]
async fn test_unknown_phone_and_wrong_password_look_identical() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;

    let unknown = fx
        .service
        .login("13899999999", PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();
    let wrong = fx
        .service
        .login(PHONE, "not-the-password", None, &ctx(IP))
        .await
        .unwrap_err();

    assert!(matches!(unknown, DomainError::Auth(AuthError::InvalidCredentials)));
    assert!(matches!(wrong, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(unknown.to_string(), wrong.to_string());

    let seen: Vec<String> = fx
        .audit
        .events_for(AuditAction::Login)
        .into_iter()
        .map(|e| e.reason)
        .collect();
    assert_eq!(seen, vec![reasons::USER_NOT_FOUND, reasons::BAD_PASSWORD]);
}

#[tokio::test]
async fn test_missing_fields_are_validation_errors() {
    let fx = Fixture::new();

    let err = fx.service.login("  ", PASSWORD, None, &ctx(IP)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);

    let err = fx.service.login(PHONE, "", None, &ctx(IP)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(fx.users.lookup_count(), 0);
}

#[tokio::test]
async fn test_inactive_user_is_forbidden_and_counted() {
    let fx = Fixture::new();
    let mut user = fx.seed_user(PHONE).await;
    user.status = "DISABLED".to_string();
    fx.users.insert(user).await;

    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::UserStatusInvalid)));
    assert_eq!(fx.failures.get(PHONE).unwrap().fail_count, 1);
    let events = fx.audit.events_for(AuditAction::Login);
    assert_eq!(events[0].reason, reasons::STATUS_NOT_ACTIVE);
}

#[tokio::test]
async fn test_fifth_failure_is_rate_limited() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;

    for _ in 0..4 {
        let err = fx
            .service
            .login(PHONE, "wrong-password", None, &ctx(IP))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    }

    let err = fx
        .service
        .login(PHONE, "wrong-password", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::IpPhoneLocked));
    assert_eq!(err.category(), ErrorCategory::RateLimited);
    assert!(fx.cache.contains(&keys::lock_ip_phone(IP, PHONE)));
}

#[tokio::test]
async fn test_locked_caller_is_rejected_before_password_check() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    for _ in 0..5 {
        let _ = fx.service.login(PHONE, "wrong-password", None, &ctx(IP)).await;
    }
    let lookups = fx.users.lookup_count();

    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();

    assert_eq!(lock_type(&err), Some(LockType::IpPhoneLocked));
    assert_eq!(fx.users.lookup_count(), lookups);
    assert!(fx.tokens.all().await.is_empty());

    let last = fx.audit.events_for(AuditAction::Login).pop().unwrap();
    assert_eq!(last.status, AuditStatus::Failed);
    assert_eq!(last.reason, "ip_phone_locked");
}

#[tokio::test]
async fn test_phone_lock_follows_the_phone_to_a_new_ip() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    for _ in 0..5 {
        let _ = fx.service.login(PHONE, "wrong-password", None, &ctx(IP)).await;
    }

    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx("10.9.9.9"))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::PhoneLocked));
}

#[tokio::test]
async fn test_ip_lock_spans_distinct_phones() {
    let fx = Fixture::new();

    for i in 0..19 {
        let phone = format!("139000000{:02}", i);
        let err = fx
            .service
            .login(&phone, "whatever", None, &ctx(IP))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    }
    let err = fx
        .service
        .login("13900000019", "whatever", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::IpLocked));

    fx.seed_user(PHONE).await;
    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::IpLocked));

    fx.service
        .login(PHONE, PASSWORD, None, &ctx("10.0.0.2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_success_clears_phone_and_pair_counters() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    for _ in 0..3 {
        let _ = fx.service.login(PHONE, "wrong-password", None, &ctx(IP)).await;
    }

    fx.service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    assert!(fx.failures.get(PHONE).is_none());
    assert!(!fx.cache.contains(&keys::fail_ip_phone(IP, PHONE)));
    assert_eq!(fx.cache.value(&keys::fail_ip(IP)).as_deref(), Some("3"));

    for _ in 0..4 {
        let err = fx
            .service
            .login(PHONE, "wrong-password", None, &ctx(IP))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    }
}

#[tokio::test]
async fn test_stored_thresholds_apply_to_next_login() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    fx.risk_configs
        .save(
            &RiskConfig {
                phone_fail_threshold: 2,
                ip_fail_threshold: 50,
                ip_phone_threshold: 50,
                lock_seconds: 60,
            },
            Utc::now(),
        )
        .await
        .unwrap();

    let _ = fx.service.login(PHONE, "wrong-password", None, &ctx(IP)).await;
    let err = fx
        .service
        .login(PHONE, "wrong-password", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::PhoneLocked));
    let reason = fx.audit.events_for(AuditAction::Login).pop().unwrap().reason;
    assert_eq!(reason, reasons::BAD_PASSWORD_LOCKED);
}

#[tokio::test]
async fn test_oversized_stored_lock_still_rejects_wrong_password() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    fx.risk_configs
        .save(
            &RiskConfig {
                lock_seconds: 10_000_000_000_000,
                ..RiskConfig::default()
            },
            Utc::now(),
        )
        .await
        .unwrap();

    let err = fx
        .service
        .login(PHONE, "wrong-password", None, &ctx(IP))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(fx.failures.get(PHONE).map(|r| r.fail_count), Some(1));
}

#[tokio::test]
async fn test_without_cache_only_phone_lock_applies() {
    let fx = Fixture::without_cache();
    fx.seed_user(PHONE).await;

    for _ in 0..4 {
        let _ = fx.service.login(PHONE, "wrong-password", None, &ctx(IP)).await;
    }
    let err = fx
        .service
        .login(PHONE, "wrong-password", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(lock_type(&err), Some(LockType::PhoneLocked));
}

#[tokio::test]
async fn test_cache_outage_fails_closed() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    fx.cache.set_unavailable(true);

    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DependencyUnavailable);
    assert_eq!(fx.users.lookup_count(), 0);
}

#[tokio::test]
async fn test_failure_store_outage_is_unavailable() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    fx.failures.set_unavailable(true);

    let err = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DependencyUnavailable);
}

#[tokio::test]
async fn test_legacy_hash_is_upgraded_on_login() {
    let fx = Fixture::new();
    let mut user = fx.seed_user(PHONE).await;
    user.password_hash = legacy_digest(PASSWORD).to_uppercase();
    fx.users.insert(user).await;

    fx.service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    let upgraded = fx.users.get(PHONE).await.unwrap();
    assert!(upgraded.password_hash.starts_with("$2"));
    assert!(bcrypt::verify(PASSWORD, &upgraded.password_hash).unwrap());
}

#[tokio::test]
async fn test_failed_upgrade_does_not_block_login() {
    let fx = Fixture::new();
    let mut user = fx.seed_user(PHONE).await;
    user.password_hash = legacy_digest(PASSWORD);
    fx.users.insert(user).await;
    fx.users.set_fail_updates(true);

    fx.service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    let unchanged = fx.users.get(PHONE).await.unwrap();
    assert_eq!(unchanged.password_hash, legacy_digest(PASSWORD));
}

#[tokio::test]
async fn test_register_creates_active_user() {
    let fx = Fixture::new();

    let response = fx
        .service
        .register(PHONE, "long-enough", Some("a@example.com".to_string()), &ctx(IP))
        .await
        .unwrap();

    let user = fx.users.get(PHONE).await.unwrap();
    assert_eq!(response.user_id, user.id);
    assert!(user.is_active());
    assert!(user.password_hash.starts_with("$2"));

    fx.service
        .login(PHONE, "long-enough", None, &ctx(IP))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_rejects_duplicate_phone() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;

    let err = fx
        .service
        .register(PHONE, "long-enough", None, &ctx(IP))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::PhoneAlreadyExists)));
    assert_eq!(err.category(), ErrorCategory::Conflict);
}

#[tokio::test]
async fn test_register_enforces_password_length_and_switch() {
    let fx = Fixture::new();
    let err = fx
        .service
        .register(PHONE, "short", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);

    let closed = Fixture::with_config(AuthServiceConfig {
        allow_registration: false,
        ..Default::default()
    });
    let err = closed
        .service
        .register(PHONE, "long-enough", None, &ctx(IP))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Forbidden);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    let first = fx
        .service
        .login(PHONE, PASSWORD, Some(60), &ctx(IP))
        .await
        .unwrap();

    let second = fx
        .service
        .refresh(&first.refresh_token, &ctx(IP))
        .await
        .unwrap();

    assert_ne!(second.refresh_token, first.refresh_token);
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.expires_in, 86_400);

    let old = fx
        .tokens
        .find_by_hash(&hash_token(&first.refresh_token))
        .await
        .unwrap();
    let new = fx
        .tokens
        .find_by_hash(&hash_token(&second.refresh_token))
        .await
        .unwrap();
    assert!(old.revoked);
    assert_eq!(old.replaced_by.as_deref(), Some(new.id.as_str()));

    let err = fx
        .service
        .refresh(&first.refresh_token, &ctx(IP))
        .await
        .unwrap_err();
    assert!(err.is_invalid_token());

    fx.service
        .refresh(&second.refresh_token, &ctx(IP))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_refresh_has_one_winner() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    let pair = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&fx.service);
        let token = pair.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            service.refresh(&token, &ctx(IP)).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(e.is_invalid_token()),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_and_garbage() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    let pair = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    let err = fx
        .service
        .refresh(&pair.access_token, &ctx(IP))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::WrongTokenType)));

    let err = fx.service.refresh("not-a-jwt", &ctx(IP)).await.unwrap_err();
    assert!(err.is_invalid_token());

    let err = fx.service.refresh("", &ctx(IP)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[tokio::test]
async fn test_refresh_requires_persisted_record() {
    let fx = Fixture::new();
    let orphan = fx
        .issuer
        .issue_refresh_token("u_ghost", "USER", 3600)
        .unwrap();

    let err = fx.service.refresh(&orphan.token, &ctx(IP)).await.unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
    let last = fx.audit.events_for(AuditAction::Refresh).pop().unwrap();
    assert_eq!(last.status, AuditStatus::Failed);
}

#[tokio::test]
async fn test_logout_revokes_and_is_idempotent() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    let pair = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();

    fx.service.logout(&pair.refresh_token, &ctx(IP)).await.unwrap();
    fx.service.logout(&pair.refresh_token, &ctx(IP)).await.unwrap();
    fx.service.logout("never-issued", &ctx(IP)).await.unwrap();

    let err = fx
        .service
        .refresh(&pair.refresh_token, &ctx(IP))
        .await
        .unwrap_err();
    assert!(err.is_invalid_token());

    let err = fx.service.logout(" ", &ctx(IP)).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let fx = Fixture::new();
    let user = fx.seed_user(PHONE).await;
    let first = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();
    let second = fx
        .service
        .login(PHONE, PASSWORD, None, &ctx("10.0.0.2"))
        .await
        .unwrap();

    let revoked = fx.service.logout_all(&user.id, &ctx(IP)).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&first.refresh_token, &second.refresh_token] {
        assert!(fx.service.refresh(token, &ctx(IP)).await.is_err());
    }
    assert_eq!(fx.service.logout_all(&user.id, &ctx(IP)).await.unwrap(), 0);

    let events = fx.audit.events_for(AuditAction::LogoutAll);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].user_id, user.id);
}

#[tokio::test]
async fn test_audit_failure_does_not_change_outcome() {
    let fx = Fixture::new();
    fx.seed_user(PHONE).await;
    fx.audit.set_should_fail(true);

    fx.service
        .login(PHONE, PASSWORD, None, &ctx(IP))
        .await
        .unwrap();
    assert!(fx.audit.events().is_empty());
}
