use async_trait::async_trait;

use crate::domain::entities::access::AccessProfile;
use crate::errors::DomainError;

/// Resolves the roles and permission codes granted to a user
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<AccessProfile, DomainError>;
}
