//! User repository trait defining the interface for user lookups and
//! credential updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for the user directory
///
/// The auth subsystem only reads users by phone, creates them at
/// registration and rewrites the password hash on legacy upgrade.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by phone number
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this phone
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Check whether a phone is already registered
    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_phone(phone).await?.is_some())
    }

    /// Insert a new user
    ///
    /// # Returns
    /// * `Err(AuthError::PhoneAlreadyExists)` - The phone is taken
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Replace the stored password hash
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
