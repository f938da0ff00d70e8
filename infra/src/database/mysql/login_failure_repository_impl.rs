//! MySQL implementation of the durable per-phone failure counter.
//!
//! The increment is a single `INSERT ... ON DUPLICATE KEY UPDATE`, so
//! concurrent failures for one phone never lose a count. MySQL applies the
//! update assignments left to right; the order below is load-bearing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sg_core::domain::entities::risk::{FailurePolicy, LoginFailure};
use sg_core::errors::DomainError;
use sg_core::repositories::LoginFailureRepository;

use super::{column, db_error};

const RECORD_FAILURE_SQL: &str = r#"
    INSERT INTO auth_login_failures (phone, fail_count, locked_until, updated_at)
    VALUES (?, 1, IF(1 >= ?, ?, NULL), ?)
    ON DUPLICATE KEY UPDATE
        fail_count = IF(locked_until IS NOT NULL AND locked_until > ?, fail_count, fail_count + 1),
        updated_at = IF(locked_until IS NOT NULL AND locked_until > ?, updated_at, ?),
        locked_until = IF(
            locked_until IS NOT NULL AND locked_until > ?,
            locked_until,
            IF(fail_count >= ?, ?, NULL)
        )
"#;

pub struct MySqlLoginFailureRepository {
    pool: MySqlPool,
}

impl MySqlLoginFailureRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_failure(row: &MySqlRow) -> Result<LoginFailure, DomainError> {
        Ok(LoginFailure {
            phone: column(row, "phone")?,
            fail_count: column(row, "fail_count")?,
            locked_until: column(row, "locked_until")?,
            updated_at: column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl LoginFailureRepository for MySqlLoginFailureRepository {
    async fn find(&self, phone: &str) -> Result<Option<LoginFailure>, DomainError> {
        let row = sqlx::query(
            "SELECT phone, fail_count, locked_until, updated_at FROM auth_login_failures WHERE phone = ? LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find login failures"))?;

        row.as_ref().map(Self::row_to_failure).transpose()
    }

    async fn record_failure(
        &self,
        phone: &str,
        now: DateTime<Utc>,
        policy: FailurePolicy,
    ) -> Result<LoginFailure, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin failure increment"))?;

        sqlx::query(RECORD_FAILURE_SQL)
            .bind(phone)
            .bind(policy.threshold)
            .bind(policy.lock_until)
            .bind(now)
            // fail_count
            .bind(now)
            // updated_at
            .bind(now)
            .bind(now)
            // locked_until
            .bind(now)
            .bind(policy.threshold)
            .bind(policy.lock_until)
            .execute(&mut *tx)
            .await
            .map_err(db_error("increment login failures"))?;

        let row = sqlx::query(
            "SELECT phone, fail_count, locked_until, updated_at FROM auth_login_failures WHERE phone = ?",
        )
        .bind(phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("read login failures"))?;

        tx.commit().await.map_err(db_error("commit failure increment"))?;
        Self::row_to_failure(&row)
    }

    async fn delete(&self, phone: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM auth_login_failures WHERE phone = ?")
            .bind(phone)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete login failures"))?;
        Ok(())
    }
}
