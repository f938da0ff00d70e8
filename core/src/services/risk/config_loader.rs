//! Runtime risk thresholds merged over compiled/env fallbacks

use std::sync::Arc;

use chrono::Utc;
use sg_shared::config::risk::MAX_LOCK_SECONDS;
use sg_shared::config::RiskConfig;
use tracing::info;

use crate::domain::entities::risk::RiskConfigChange;
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::RiskConfigRepository;

/// Loads the effective [`RiskConfig`] for each request
///
/// There is no in-process cache: an admin update is visible to the very
/// next login.
pub struct RiskConfigLoader<R>
where
    R: RiskConfigRepository,
{
    repository: Arc<R>,
    fallback: RiskConfig,
}

impl<R> RiskConfigLoader<R>
where
    R: RiskConfigRepository,
{
    /// `fallback` is normalized so every field is positive
    pub fn new(repository: Arc<R>, fallback: RiskConfig) -> Self {
        Self {
            repository,
            fallback: fallback.normalized(),
        }
    }

    pub fn fallback(&self) -> RiskConfig {
        self.fallback
    }

    /// Stored row merged over the fallback; a missing row yields the fallback
    pub async fn load(&self) -> DomainResult<RiskConfig> {
        let stored = self.repository.load().await?;
        Ok(match stored {
            Some(row) => self.fallback.merged_with(&row),
            None => self.fallback,
        })
    }

    /// Validate and persist a new config, then append the change log.
    ///
    /// Returns the effective config after the write. A failure to append the
    /// change log is logged and not returned.
    pub async fn update(&self, operator_user_id: &str, next: RiskConfig) -> DomainResult<RiskConfig> {
        validate(&next)?;
        let previous = self.load().await?;

        self.repository.save(&next, Utc::now()).await?;

        let change = RiskConfigChange::new(operator_user_id, previous, next);
        if let Err(e) = self.repository.append_change(&change).await {
            tracing::warn!(error = %e, "Failed to append risk config change log");
        }

        info!(
            operator = operator_user_id,
            phone_fail_threshold = next.phone_fail_threshold,
            ip_fail_threshold = next.ip_fail_threshold,
            ip_phone_threshold = next.ip_phone_threshold,
            lock_seconds = next.lock_seconds,
            "Risk config updated"
        );
        Ok(next)
    }
}

fn validate(config: &RiskConfig) -> Result<(), ValidationError> {
    let fields = [
        ("phone_fail_threshold", config.phone_fail_threshold),
        ("ip_fail_threshold", config.ip_fail_threshold),
        ("ip_phone_threshold", config.ip_phone_threshold),
        ("lock_seconds", config.lock_seconds),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, value)| *value <= 0) {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if config.lock_seconds > MAX_LOCK_SECONDS {
        return Err(ValidationError::OutOfRange {
            field: "lock_seconds".to_string(),
            max: MAX_LOCK_SECONDS,
        });
    }
    Ok(())
}
