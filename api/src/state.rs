//! Application state shared by every handler
//!
//! The services are generic over their stores. [`Stores`] bundles the seven
//! store types behind one parameter so handlers stay `fn handler<S: Stores>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sg_core::errors::{DomainError, DomainResult};
use sg_core::repositories::{
    AuditSink, LoginFailureRepository, PermissionResolver, RefreshTokenRepository,
    RiskConfigRepository, UserRepository,
};
use sg_core::services::{AuthService, RiskAdminService, RiskCache, TokenIssuer};
use sg_shared::config::ServerConfig;

/// The concrete store types one deployment is wired with
pub trait Stores: 'static {
    type Users: UserRepository + 'static;
    type Tokens: RefreshTokenRepository + 'static;
    type Failures: LoginFailureRepository + 'static;
    type Cache: RiskCache + 'static;
    type RiskConfigs: RiskConfigRepository + 'static;
    type Audit: AuditSink + 'static;
    type Permissions: PermissionResolver + 'static;
}

pub type AuthServiceOf<S> = AuthService<
    <S as Stores>::Users,
    <S as Stores>::Tokens,
    <S as Stores>::Failures,
    <S as Stores>::Cache,
    <S as Stores>::RiskConfigs,
    <S as Stores>::Audit,
>;

pub type AdminServiceOf<S> = RiskAdminService<
    <S as Stores>::Failures,
    <S as Stores>::Cache,
    <S as Stores>::RiskConfigs,
    <S as Stores>::Permissions,
>;

/// Reachability of the backing stores for `/health`
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn database(&self) -> bool;

    /// `None` when the cache is not configured
    async fn cache(&self) -> Option<bool>;
}

/// Per-request HTTP settings, also registered on its own for extractors
#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub trust_proxy_headers: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            trust_proxy_headers: false,
        }
    }
}

impl From<&ServerConfig> for HttpSettings {
    fn from(server: &ServerConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(server.request_timeout.max(1)),
            trust_proxy_headers: server.trust_proxy_headers,
        }
    }
}

pub struct AppState<S: Stores> {
    pub auth_service: Arc<AuthServiceOf<S>>,
    pub admin_service: Arc<AdminServiceOf<S>>,
    /// Verifies bearer tokens in [`JwtAuth`](crate::middleware::JwtAuth)
    pub token_issuer: Arc<TokenIssuer>,
    pub health: Arc<dyn HealthCheck>,
    pub settings: HttpSettings,
}

impl<S: Stores> AppState<S> {
    /// Run one service call under the request timeout. Expiry maps to 503.
    pub async fn bounded<T, F>(&self, operation: F) -> DomainResult<T>
    where
        F: std::future::Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.settings.request_timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.settings.request_timeout.as_millis() as u64,
                    "Request timed out waiting on a store"
                );
                Err(DomainError::DependencyUnavailable {
                    dependency: "store".to_string(),
                    message: "request timed out".to_string(),
                })
            }
        }
    }
}
