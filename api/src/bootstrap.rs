//! Production wiring: MySQL repositories, the optional Redis risk cache and
//! the services built on them.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sg_core::services::{
    AuditService, AuditServiceConfig, AuthService, AuthServiceConfig, LoginRiskGuard,
    PasswordVerifier, RiskAdminService, RiskConfigLoader, TokenCleanupConfig,
    TokenCleanupService, TokenIssuer, TokenIssuerConfig,
};
use sg_core::services::password::DEFAULT_BCRYPT_COST;
use sg_infra::cache::{RedisClient, RedisRiskCache};
use sg_infra::database::{
    DatabasePool, MySqlAuditSink, MySqlLoginFailureRepository, MySqlPermissionResolver,
    MySqlRefreshTokenRepository, MySqlRiskConfigRepository, MySqlUserRepository,
};
use sg_shared::AppConfig;
use tracing::{info, warn};

use crate::state::{AppState, HealthCheck, HttpSettings, Stores};

/// MySQL for everything durable, Redis for the ephemeral risk counters
pub struct InfraStores;

impl Stores for InfraStores {
    type Users = MySqlUserRepository;
    type Tokens = MySqlRefreshTokenRepository;
    type Failures = MySqlLoginFailureRepository;
    type Cache = RedisRiskCache;
    type RiskConfigs = MySqlRiskConfigRepository;
    type Audit = MySqlAuditSink;
    type Permissions = MySqlPermissionResolver;
}

/// Pings the pool and, when configured, Redis
pub struct InfraHealth {
    database: DatabasePool,
    redis: Option<Arc<RedisClient>>,
}

#[async_trait]
impl HealthCheck for InfraHealth {
    async fn database(&self) -> bool {
        self.database.health_check().await.unwrap_or(false)
    }

    async fn cache(&self) -> Option<bool> {
        match &self.redis {
            Some(client) => Some(client.health_check().await.unwrap_or(false)),
            None => None,
        }
    }
}

/// Everything `main` needs to serve and to shut down
pub struct Runtime {
    pub state: AppState<InfraStores>,
    pub database: DatabasePool,
    pub cleanup: Arc<TokenCleanupService<MySqlRefreshTokenRepository>>,
}

/// Connect the stores and build the services
///
/// MySQL must be reachable. Redis is optional: when disabled or unreachable
/// the server runs with the durable phone counter only.
pub async fn build(config: &AppConfig) -> anyhow::Result<Runtime> {
    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to MySQL")?;
    info!("{}", database.get_statistics());
    let pool = database.get_pool().clone();

    let redis = connect_redis(config).await;

    if config.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        warn!("Using the built-in development JWT secret");
    }
    let token_issuer = Arc::new(TokenIssuer::new(TokenIssuerConfig::from(&config.jwt)));

    let users = Arc::new(MySqlUserRepository::new(pool.clone()));
    let tokens = Arc::new(MySqlRefreshTokenRepository::new(pool.clone()));
    let failures = Arc::new(MySqlLoginFailureRepository::new(pool.clone()));
    let risk_configs = Arc::new(MySqlRiskConfigRepository::new(pool.clone()));
    let permissions = Arc::new(MySqlPermissionResolver::new(pool.clone()));
    let audit_sink = Arc::new(MySqlAuditSink::new(pool));

    let cache = redis.clone().map(|client| Arc::new(RedisRiskCache::new(client)));
    let risk_guard = Arc::new(LoginRiskGuard::new(failures, cache));
    let risk_loader = Arc::new(RiskConfigLoader::new(risk_configs.clone(), config.risk));
    let audit = Arc::new(AuditService::new(audit_sink, AuditServiceConfig::default()));

    let auth_service = AuthService::new(
        users,
        tokens.clone(),
        token_issuer.clone(),
        PasswordVerifier::new(DEFAULT_BCRYPT_COST),
        risk_guard.clone(),
        risk_loader.clone(),
        AuthServiceConfig::default(),
    )
    .with_audit(audit);

    let admin_service = RiskAdminService::new(risk_guard, risk_loader, risk_configs, permissions);

    let cleanup = Arc::new(TokenCleanupService::new(tokens, TokenCleanupConfig::default()));

    let state = AppState {
        auth_service: Arc::new(auth_service),
        admin_service: Arc::new(admin_service),
        token_issuer,
        health: Arc::new(InfraHealth {
            database: database.clone(),
            redis,
        }),
        settings: HttpSettings::from(&config.server),
    };

    Ok(Runtime {
        state,
        database,
        cleanup,
    })
}

async fn connect_redis(config: &AppConfig) -> Option<Arc<RedisClient>> {
    if !config.cache.enabled {
        warn!("Redis disabled; IP and IP+phone lockouts are off");
        return None;
    }
    match RedisClient::new(&config.cache).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "Redis unreachable at start-up; running with the durable counter only");
            None
        }
    }
}
