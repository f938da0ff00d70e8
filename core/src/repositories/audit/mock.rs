//! Recording audit sink for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::audit::{AuditAction, AuditEvent};
use crate::errors::DomainError;

use super::AuditSink;

#[derive(Clone, Default)]
pub struct MockAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether writes should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, action: AuditAction) -> Vec<AuditEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.action == action)
            .collect()
    }

    /// Wait until at least `count` events have been written or the timeout passes
    pub async fn wait_for(&self, count: usize) -> Vec<AuditEvent> {
        for _ in 0..50 {
            if self.events.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.events()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn write(&self, event: &AuditEvent) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Mock audit sink error".to_string(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
