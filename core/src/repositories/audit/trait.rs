//! Audit sink trait for the login log.

use async_trait::async_trait;

use crate::domain::entities::audit::AuditEvent;
use crate::errors::DomainError;

/// Destination for authentication audit events
///
/// Callers never await this on the request path; see
/// [`AuditService`](crate::services::audit::AuditService).
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one event
    async fn write(&self, event: &AuditEvent) -> Result<(), DomainError>;
}
