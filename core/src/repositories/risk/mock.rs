//! In-memory risk stores for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sg_shared::config::RiskConfig;
use sg_shared::{Page, PageRequest};

use crate::domain::entities::risk::{
    FailurePolicy, LoginFailure, RiskConfigChange, UnlockLogFilter, UnlockRecord,
};
use crate::errors::DomainError;

use super::r#trait::{LoginFailureRepository, RiskConfigRepository};

/// Mock durable failure counter; the mutex gives the same per-row atomicity as the upsert
#[derive(Clone, Default)]
pub struct MockLoginFailureRepository {
    rows: Arc<Mutex<HashMap<String, LoginFailure>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockLoginFailureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Seed or overwrite a row
    pub fn put(&self, row: LoginFailure) {
        self.rows.lock().unwrap().insert(row.phone.clone(), row);
    }

    pub fn get(&self, phone: &str) -> Option<LoginFailure> {
        self.rows.lock().unwrap().get(phone).cloned()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("mock failure store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl LoginFailureRepository for MockLoginFailureRepository {
    async fn find(&self, phone: &str) -> Result<Option<LoginFailure>, DomainError> {
        self.check()?;
        Ok(self.get(phone))
    }

    async fn record_failure(
        &self,
        phone: &str,
        now: DateTime<Utc>,
        policy: FailurePolicy,
    ) -> Result<LoginFailure, DomainError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let next = LoginFailure::apply_failure(rows.get(phone).cloned(), phone, now, policy);
        rows.insert(phone.to_string(), next.clone());
        Ok(next)
    }

    async fn delete(&self, phone: &str) -> Result<(), DomainError> {
        self.check()?;
        self.rows.lock().unwrap().remove(phone);
        Ok(())
    }
}

/// Mock risk configuration row plus captured change logs
#[derive(Clone, Default)]
pub struct MockRiskConfigRepository {
    row: Arc<Mutex<Option<RiskConfig>>>,
    changes: Arc<Mutex<Vec<RiskConfigChange>>>,
    unlocks: Arc<Mutex<Vec<UnlockRecord>>>,
    unavailable: Arc<AtomicBool>,
    fail_logs: Arc<AtomicBool>,
}

impl MockRiskConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(config: RiskConfig) -> Self {
        let repo = Self::default();
        *repo.row.lock().unwrap() = Some(config);
        repo
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only the log appends fail
    pub fn set_fail_logs(&self, fail: bool) {
        self.fail_logs.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Option<RiskConfig> {
        *self.row.lock().unwrap()
    }

    pub fn changes(&self) -> Vec<RiskConfigChange> {
        self.changes.lock().unwrap().clone()
    }

    pub fn unlocks(&self) -> Vec<UnlockRecord> {
        self.unlocks.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("mock risk config store offline"));
        }
        Ok(())
    }

    fn check_logs(&self) -> Result<(), DomainError> {
        self.check()?;
        if self.fail_logs.load(Ordering::SeqCst) {
            return Err(DomainError::database("mock log table offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl RiskConfigRepository for MockRiskConfigRepository {
    async fn load(&self) -> Result<Option<RiskConfig>, DomainError> {
        self.check()?;
        Ok(self.stored())
    }

    async fn save(&self, config: &RiskConfig, _updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        self.check()?;
        *self.row.lock().unwrap() = Some(*config);
        Ok(())
    }

    async fn append_change(&self, change: &RiskConfigChange) -> Result<(), DomainError> {
        self.check_logs()?;
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }

    async fn append_unlock(&self, record: &UnlockRecord) -> Result<(), DomainError> {
        self.check_logs()?;
        self.unlocks.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_changes(&self, page: PageRequest) -> Result<Page<RiskConfigChange>, DomainError> {
        self.check_logs()?;
        let newest_first = self.changes().into_iter().rev().collect();
        Ok(paginate(newest_first, page))
    }

    async fn list_unlocks(
        &self,
        filter: &UnlockLogFilter,
        page: PageRequest,
    ) -> Result<Page<UnlockRecord>, DomainError> {
        self.check_logs()?;
        let newest_first = self
            .unlocks()
            .into_iter()
            .rev()
            .filter(|record| filter.matches(record))
            .collect();
        Ok(paginate(newest_first, page))
    }
}

/// Insertion order stands in for `created_at`
fn paginate<T>(newest_first: Vec<T>, page: PageRequest) -> Page<T> {
    let total = newest_first.len() as u64;
    let items = newest_first
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(items, page, total)
}
