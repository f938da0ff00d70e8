//! Mock-backed application state for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;
use sg_api::{AppState, HealthCheck, HttpSettings, Stores};
use sg_core::repositories::{
    MockAuditSink, MockLoginFailureRepository, MockPermissionResolver,
    MockRefreshTokenRepository, MockRiskConfigRepository, MockUserRepository,
};
use sg_core::services::risk::MockRiskCache;
use sg_core::services::{
    AuditService, AuditServiceConfig, AuthService, AuthServiceConfig, LoginRiskGuard,
    PasswordVerifier, RiskAdminService, RiskConfigLoader, TokenIssuer, TokenIssuerConfig,
};
use sg_core::User;
use sg_shared::RiskConfig;

pub const TEST_SECRET: &str = "api-test-secret";
pub const PASSWORD: &str = "correct-horse";
pub const CLIENT_IP: &str = "198.51.100.20";

pub struct MockStores;

impl Stores for MockStores {
    type Users = MockUserRepository;
    type Tokens = MockRefreshTokenRepository;
    type Failures = MockLoginFailureRepository;
    type Cache = MockRiskCache;
    type RiskConfigs = MockRiskConfigRepository;
    type Audit = MockAuditSink;
    type Permissions = MockPermissionResolver;
}

pub struct StaticHealth {
    pub database: bool,
    pub cache: Option<bool>,
}

#[async_trait]
impl HealthCheck for StaticHealth {
    async fn database(&self) -> bool {
        self.database
    }

    async fn cache(&self) -> Option<bool> {
        self.cache
    }
}

/// State plus handles on every mock for assertions
pub struct TestContext {
    pub state: web::Data<AppState<MockStores>>,
    pub users: MockUserRepository,
    pub tokens: MockRefreshTokenRepository,
    pub failures: MockLoginFailureRepository,
    pub cache: MockRiskCache,
    pub risk_configs: MockRiskConfigRepository,
    pub permissions: MockPermissionResolver,
    pub audit: MockAuditSink,
    pub issuer: Arc<TokenIssuer>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_health(StaticHealth {
            database: true,
            cache: Some(true),
        })
    }

    pub fn with_health(health: StaticHealth) -> Self {
        let users = MockUserRepository::new();
        let tokens = MockRefreshTokenRepository::new();
        let failures = MockLoginFailureRepository::new();
        let cache = MockRiskCache::new();
        let risk_configs = MockRiskConfigRepository::new();
        let permissions = MockPermissionResolver::new();
        let audit = MockAuditSink::new();

        let issuer = Arc::new(TokenIssuer::new(TokenIssuerConfig {
            jwt_secret: TEST_SECRET.to_string(),
            ..Default::default()
        }));
        let guard = Arc::new(LoginRiskGuard::new(
            Arc::new(failures.clone()),
            Some(Arc::new(cache.clone())),
        ));
        let loader = Arc::new(RiskConfigLoader::new(
            Arc::new(risk_configs.clone()),
            RiskConfig::default(),
        ));
        let audit_service = Arc::new(AuditService::new(
            Arc::new(audit.clone()),
            AuditServiceConfig {
                async_writes: false,
            },
        ));

        let auth_service = AuthService::new(
            Arc::new(users.clone()),
            Arc::new(tokens.clone()),
            Arc::clone(&issuer),
            PasswordVerifier::new(4),
            guard.clone(),
            loader.clone(),
            AuthServiceConfig::default(),
        )
        .with_audit(audit_service);

        let admin_service = RiskAdminService::new(
            guard,
            loader,
            Arc::new(risk_configs.clone()),
            Arc::new(permissions.clone()),
        );

        let state = web::Data::new(AppState {
            auth_service: Arc::new(auth_service),
            admin_service: Arc::new(admin_service),
            token_issuer: Arc::clone(&issuer),
            health: Arc::new(health),
            settings: HttpSettings {
                request_timeout: Duration::from_secs(5),
                trust_proxy_headers: true,
            },
        });

        Self {
            state,
            users,
            tokens,
            failures,
            cache,
            risk_configs,
            permissions,
            audit,
            issuer,
        }
    }

    /// Seed an active user whose password is [`PASSWORD`]
    pub async fn seed_user(&self, id: &str, phone: &str) -> User {
        let hash = PasswordVerifier::new(4).hash(PASSWORD).await.unwrap();
        let mut user = User::new(phone, None, hash);
        user.id = id.to_string();
        self.users.insert(user.clone()).await;
        user
    }

    /// A valid access token for `user_id` with the role its id implies
    pub fn access_token(&self, user_id: &str) -> String {
        let role = sg_core::Role::for_user_id(user_id);
        self.issuer
            .issue_access_token(user_id, role.as_str(), 3600)
            .unwrap()
    }

    pub fn bearer(&self, user_id: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.access_token(user_id)))
    }
}
