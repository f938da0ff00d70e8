//! Fixed-answer permission resolver for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::access::AccessProfile;
use crate::errors::DomainError;

use super::r#trait::PermissionResolver;

#[derive(Clone, Default)]
pub struct MockPermissionResolver {
    profiles: Arc<Mutex<HashMap<String, AccessProfile>>>,
}

impl MockPermissionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, profile: AccessProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl PermissionResolver for MockPermissionResolver {
    async fn resolve(&self, user_id: &str) -> Result<AccessProfile, DomainError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| AccessProfile::empty(user_id)))
    }
}
