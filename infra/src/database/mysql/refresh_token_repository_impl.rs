//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Rotation relies on a conditional `UPDATE ... WHERE revoked = 0`: of any
//! number of concurrent rotations of one row exactly one affects it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sg_core::domain::entities::token::RefreshTokenRecord;
use sg_core::errors::{DomainError, TokenError};
use sg_core::repositories::RefreshTokenRepository;

use super::{column, db_error};

const SELECT_COLUMNS: &str =
    "id, user_id, token_hash, expires_at, revoked, revoked_at, replaced_by, created_at";

pub struct MySqlRefreshTokenRepository {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        Ok(RefreshTokenRecord {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            expires_at: column(row, "expires_at")?,
            revoked: column(row, "revoked")?,
            revoked_at: column(row, "revoked_at")?,
            replaced_by: column(row, "replaced_by")?,
            created_at: column(row, "created_at")?,
        })
    }
}

const INSERT_SQL: &str = r#"
    INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, revoked, created_at)
    VALUES (?, ?, ?, ?, 0, ?)
"#;

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn create(&self, record: &RefreshTokenRecord) -> Result<String, DomainError> {
        sqlx::query(INSERT_SQL)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.token_hash)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("insert refresh token"))?;

        Ok(record.id.clone())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? AND revoked = 0 AND expires_at > ? LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find refresh token"))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn rotate(
        &self,
        old_id: &str,
        successor: &RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("begin rotation"))?;

        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = 1, revoked_at = ?, replaced_by = ?
            WHERE id = ? AND revoked = 0
            "#,
        )
        .bind(now)
        .bind(&successor.id)
        .bind(old_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("revoke rotated token"))?;

        if result.rows_affected() != 1 {
            tx.rollback().await.map_err(db_error("rollback rotation"))?;
            tracing::debug!(token_id = old_id, "Lost refresh rotation race");
            return Err(TokenError::InvalidToken.into());
        }

        sqlx::query(INSERT_SQL)
            .bind(&successor.id)
            .bind(&successor.user_id)
            .bind(&successor.token_hash)
            .bind(successor.expires_at)
            .bind(successor.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert successor token"))?;

        tx.commit().await.map_err(db_error("commit rotation"))?;
        Ok(successor.id.clone())
    }

    async fn revoke(&self, id: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = 1, revoked_at = ? WHERE id = ? AND revoked = 0",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("revoke refresh token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all(&self, user_id: &str, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = 1, revoked_at = ? WHERE user_id = ? AND revoked = 0",
        )
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("revoke user tokens"))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete expired tokens"))?;

        Ok(result.rows_affected())
    }
}
