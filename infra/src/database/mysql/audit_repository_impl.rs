//! MySQL audit sink writing the `auth_login_logs` table.

use async_trait::async_trait;
use sqlx::MySqlPool;

use sg_core::domain::entities::audit::AuditEvent;
use sg_core::errors::DomainError;
use sg_core::repositories::AuditSink;

use super::db_error;

/// Longest user agent kept; the column is `VARCHAR(255)`
const MAX_USER_AGENT: usize = 255;

pub struct MySqlAuditSink {
    pool: MySqlPool,
}

impl MySqlAuditSink {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for MySqlAuditSink {
    async fn write(&self, event: &AuditEvent) -> Result<(), DomainError> {
        let user_agent: String = event.user_agent.chars().take(MAX_USER_AGENT).collect();

        sqlx::query(
            r#"
            INSERT INTO auth_login_logs (id, user_id, phone, action, status, reason, ip, user_agent, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.user_id)
        .bind(&event.phone)
        .bind(event.action.as_str())
        .bind(event.status.as_str())
        .bind(&event.reason)
        .bind(&event.ip)
        .bind(user_agent)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("write login log"))?;

        Ok(())
    }
}
