use std::sync::Arc;

use sg_shared::config::RiskConfig;
use sg_shared::{mask_phone_number, Page, PageRequest};
use tracing::{info, warn};

use crate::domain::entities::access::AccessProfile;
use crate::domain::entities::risk::{RiskConfigChange, UnlockLogFilter, UnlockRecord};
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::{LoginFailureRepository, PermissionResolver, RiskConfigRepository};
use crate::services::risk::{LoginRiskGuard, RiskCache, RiskConfigLoader};

/// Targets of a manual unlock. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct UnlockRequest {
    pub phone: Option<String>,
    pub ip: Option<String>,
    pub reason: Option<String>,
}

impl UnlockRequest {
    fn normalized(self) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            phone: clean(self.phone),
            ip: clean(self.ip),
            reason: clean(self.reason),
        }
    }
}

/// Operations behind the `/admin/auth` routes
///
/// Callers are expected to have checked the ADMIN role already.
pub struct RiskAdminService<F, C, R, P>
where
    F: LoginFailureRepository,
    C: RiskCache,
    R: RiskConfigRepository,
    P: PermissionResolver,
{
    risk_guard: Arc<LoginRiskGuard<F, C>>,
    risk_config: Arc<RiskConfigLoader<R>>,
    config_repository: Arc<R>,
    permissions: Arc<P>,
}

impl<F, C, R, P> RiskAdminService<F, C, R, P>
where
    F: LoginFailureRepository,
    C: RiskCache,
    R: RiskConfigRepository,
    P: PermissionResolver,
{
    pub fn new(
        risk_guard: Arc<LoginRiskGuard<F, C>>,
        risk_config: Arc<RiskConfigLoader<R>>,
        config_repository: Arc<R>,
        permissions: Arc<P>,
    ) -> Self {
        Self {
            risk_guard,
            risk_config,
            config_repository,
            permissions,
        }
    }

    /// Effective thresholds: stored row merged over the fallback
    pub async fn get_config(&self) -> DomainResult<RiskConfig> {
        self.risk_config.load().await
    }

    /// Replace the stored thresholds. Every field must be positive.
    pub async fn update_config(&self, operator_user_id: &str, next: RiskConfig) -> DomainResult<RiskConfig> {
        self.risk_config.update(operator_user_id, next).await
    }

    /// Lift locks and counters for a phone, an IP, or both
    ///
    /// The unlock log is best effort: once the locks are released a failed
    /// log write is only reported as a warning.
    ///
    /// # Returns
    ///
    /// * `Ok(UnlockRecord)` - The log entry describing the unlock
    /// * `Err(ValidationErr)` - Neither phone nor IP was given
    pub async fn unlock(&self, operator_user_id: &str, request: UnlockRequest) -> DomainResult<UnlockRecord> {
        let request = request.normalized();
        if request.phone.is_none() && request.ip.is_none() {
            return Err(ValidationError::Rule {
                message: "phone or ip is required".to_string(),
            }
            .into());
        }

        self.risk_guard
            .release(request.phone.as_deref(), request.ip.as_deref())
            .await?;

        let record = UnlockRecord::new(
            operator_user_id,
            request.phone,
            request.ip,
            request.reason,
        );
        if let Err(e) = self.config_repository.append_unlock(&record).await {
            warn!(operator = operator_user_id, error = %e, "Failed to append unlock log");
        }

        info!(
            operator = operator_user_id,
            phone = %record.phone.as_deref().map(mask_phone_number).unwrap_or_default(),
            ip = record.ip.as_deref().unwrap_or_default(),
            "Login lock released"
        );
        Ok(record)
    }

    /// Threshold change history, newest first
    pub async fn list_config_changes(&self, page: PageRequest) -> DomainResult<Page<RiskConfigChange>> {
        self.config_repository.list_changes(page).await
    }

    /// Manual unlock history, newest first. Blank filter values are ignored.
    pub async fn list_unlocks(
        &self,
        filter: UnlockLogFilter,
        page: PageRequest,
    ) -> DomainResult<Page<UnlockRecord>> {
        self.config_repository
            .list_unlocks(&filter.normalized(), page)
            .await
    }

    pub async fn access_profile(&self, user_id: &str) -> DomainResult<AccessProfile> {
        self.permissions.resolve(user_id).await
    }
}
