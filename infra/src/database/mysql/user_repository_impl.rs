//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sg_core::domain::entities::user::User;
use sg_core::errors::{AuthError, DomainError};
use sg_core::repositories::UserRepository;

use super::{column, db_error};

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let email: Option<String> = column(row, "email")?;
        Ok(User {
            id: column(row, "id")?,
            phone: column(row, "phone")?,
            email: email.filter(|e| !e.is_empty()),
            password_hash: column(row, "password_hash")?,
            status: column(row, "status")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, phone, email, password_hash, status, created_at, updated_at
            FROM users
            WHERE phone = ?
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by phone"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE phone = ?")
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count users by phone"))?;

        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, phone, email, password_hash, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.phone)
        .bind(user.email.as_deref().unwrap_or_default())
        .bind(&user.password_hash)
        .bind(&user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::PhoneAlreadyExists.into())
            }
            Err(e) => Err(db_error("insert user")(e)),
        }
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(updated_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("update password hash"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("User {}", user_id),
            });
        }
        Ok(())
    }
}
