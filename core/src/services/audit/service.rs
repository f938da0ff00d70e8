//! Audit service for the login log.
//!
//! Writes are handed to a background task so a slow or failing sink never
//! delays or changes an authentication decision.

use std::sync::Arc;
use tokio::task;

use crate::domain::entities::audit::{AuditAction, AuditEvent};
use crate::domain::value_objects::RequestContext;
use crate::repositories::AuditSink;

/// Configuration for the audit service
#[derive(Debug, Clone)]
pub struct AuditServiceConfig {
    /// Whether to run audit writes asynchronously
    pub async_writes: bool,
}

impl Default for AuditServiceConfig {
    fn default() -> Self {
        Self { async_writes: true }
    }
}

/// Fire-and-forget front for an [`AuditSink`]
pub struct AuditService<A>
where
    A: AuditSink,
{
    sink: Arc<A>,
    config: AuditServiceConfig,
}

impl<A> AuditService<A>
where
    A: AuditSink + 'static,
{
    pub fn new(sink: Arc<A>, config: AuditServiceConfig) -> Self {
        Self { sink, config }
    }

    /// Record a successful action
    pub async fn success(&self, action: AuditAction, user_id: &str, phone: &str, ctx: &RequestContext) {
        let event = AuditEvent::success(action)
            .with_user(user_id)
            .with_phone(phone)
            .with_client(ctx.ip.as_str(), ctx.user_agent.as_str());
        self.record(event).await;
    }

    /// Record a failed action with a machine-readable reason
    pub async fn failure(
        &self,
        action: AuditAction,
        user_id: &str,
        phone: &str,
        reason: &str,
        ctx: &RequestContext,
    ) {
        let event = AuditEvent::failed(action, reason)
            .with_user(user_id)
            .with_phone(phone)
            .with_client(ctx.ip.as_str(), ctx.user_agent.as_str());
        self.record(event).await;
    }

    /// Write an event. Errors are logged and never returned.
    pub async fn record(&self, event: AuditEvent) {
        if self.config.async_writes {
            let sink = Arc::clone(&self.sink);
            task::spawn(async move {
                if let Err(e) = sink.write(&event).await {
                    tracing::warn!(action = event.action.as_str(), error = %e, "Failed to write audit event");
                }
            });
        } else if let Err(e) = self.sink.write(&event).await {
            tracing::warn!(action = event.action.as_str(), error = %e, "Failed to write audit event");
        }
    }
}
