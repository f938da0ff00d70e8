//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

/// Mock user repository keyed by phone
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
    fail_updates: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.phone.clone(), user);
    }

    pub async fn get(&self, phone: &str) -> Option<User> {
        self.users.read().await.get(phone).cloned()
    }

    /// Make `update_password_hash` fail
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of `find_by_phone` calls so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.read().await.get(phone).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.phone) {
            return Err(AuthError::PhoneAlreadyExists.into());
        }
        users.insert(user.phone.clone(), user.clone());
        Ok(())
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::database("mock update failure"));
        }
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })?;
        user.password_hash = password_hash.to_string();
        user.updated_at = updated_at;
        Ok(())
    }
}
