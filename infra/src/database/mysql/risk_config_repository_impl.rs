//! MySQL implementation of the runtime risk configuration and its logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use sg_core::domain::entities::risk::{RiskConfigChange, UnlockLogFilter, UnlockRecord};
use sg_core::errors::DomainError;
use sg_core::repositories::RiskConfigRepository;
use sg_shared::config::RiskConfig;
use sg_shared::{Page, PageRequest};

use super::{column, db_error};

/// Primary key of the single configuration row
const CONFIG_ROW_ID: &str = "default";

pub struct MySqlRiskConfigRepository {
    pool: MySqlPool,
}

impl MySqlRiskConfigRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RiskConfigRepository for MySqlRiskConfigRepository {
    async fn load(&self) -> Result<Option<RiskConfig>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT phone_fail_threshold, ip_fail_threshold, ip_phone_threshold, lock_seconds
            FROM auth_risk_configs
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(CONFIG_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("load risk config"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(RiskConfig {
            phone_fail_threshold: column(&row, "phone_fail_threshold")?,
            ip_fail_threshold: column(&row, "ip_fail_threshold")?,
            ip_phone_threshold: column(&row, "ip_phone_threshold")?,
            lock_seconds: column(&row, "lock_seconds")?,
        }))
    }

    async fn save(&self, config: &RiskConfig, updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO auth_risk_configs
                (id, phone_fail_threshold, ip_fail_threshold, ip_phone_threshold, lock_seconds, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                phone_fail_threshold = VALUES(phone_fail_threshold),
                ip_fail_threshold = VALUES(ip_fail_threshold),
                ip_phone_threshold = VALUES(ip_phone_threshold),
                lock_seconds = VALUES(lock_seconds),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(CONFIG_ROW_ID)
        .bind(config.phone_fail_threshold)
        .bind(config.ip_fail_threshold)
        .bind(config.ip_phone_threshold)
        .bind(config.lock_seconds)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("save risk config"))?;

        Ok(())
    }

    async fn append_change(&self, change: &RiskConfigChange) -> Result<(), DomainError> {
        let (old, new) = (&change.old_config, &change.new_config);
        sqlx::query(
            r#"
            INSERT INTO auth_risk_config_logs (
                id, operator_user_id,
                old_phone_fail, old_ip_fail, old_ip_phone, old_lock_seconds,
                new_phone_fail, new_ip_fail, new_ip_phone, new_lock_seconds,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&change.id)
        .bind(&change.operator_user_id)
        .bind(old.phone_fail_threshold)
        .bind(old.ip_fail_threshold)
        .bind(old.ip_phone_threshold)
        .bind(old.lock_seconds)
        .bind(new.phone_fail_threshold)
        .bind(new.ip_fail_threshold)
        .bind(new.ip_phone_threshold)
        .bind(new.lock_seconds)
        .bind(change.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("append risk config log"))?;

        Ok(())
    }

    async fn append_unlock(&self, record: &UnlockRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO auth_unlock_logs (id, operator_user_id, phone, ip, reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.operator_user_id)
        .bind(record.phone.as_deref().unwrap_or_default())
        .bind(record.ip.as_deref().unwrap_or_default())
        .bind(record.reason.as_deref().unwrap_or_default())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("append unlock log"))?;

        Ok(())
    }

    async fn list_changes(&self, page: PageRequest) -> Result<Page<RiskConfigChange>, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_risk_config_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count risk config logs"))?;

        let rows = sqlx::query(
            r#"
            SELECT id, operator_user_id,
                   old_phone_fail, old_ip_fail, old_ip_phone, old_lock_seconds,
                   new_phone_fail, new_ip_fail, new_ip_phone, new_lock_seconds,
                   created_at
            FROM auth_risk_config_logs
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list risk config logs"))?;

        let items = rows
            .iter()
            .map(row_to_change)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total.max(0) as u64))
    }

    async fn list_unlocks(
        &self,
        filter: &UnlockLogFilter,
        page: PageRequest,
    ) -> Result<Page<UnlockRecord>, DomainError> {
        let mut conditions = Vec::new();
        let mut args: Vec<&str> = Vec::new();
        for (column, value) in [
            ("phone", &filter.phone),
            ("ip", &filter.ip),
            ("operator_user_id", &filter.operator_user_id),
        ] {
            if let Some(value) = value {
                conditions.push(format!("{} = ?", column));
                args.push(value.as_str());
            }
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM auth_unlock_logs {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = count_query.bind(*arg);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count unlock logs"))?;

        let list_sql = format!(
            r#"
            SELECT id, operator_user_id, phone, ip, reason, created_at
            FROM auth_unlock_logs
            {}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );
        let mut list_query = sqlx::query(&list_sql);
        for arg in &args {
            list_query = list_query.bind(*arg);
        }
        let rows = list_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list unlock logs"))?;

        let items = rows
            .iter()
            .map(row_to_unlock)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total.max(0) as u64))
    }
}

fn row_to_change(row: &MySqlRow) -> Result<RiskConfigChange, DomainError> {
    Ok(RiskConfigChange {
        id: column(row, "id")?,
        operator_user_id: column(row, "operator_user_id")?,
        old_config: RiskConfig {
            phone_fail_threshold: column(row, "old_phone_fail")?,
            ip_fail_threshold: column(row, "old_ip_fail")?,
            ip_phone_threshold: column(row, "old_ip_phone")?,
            lock_seconds: column(row, "old_lock_seconds")?,
        },
        new_config: RiskConfig {
            phone_fail_threshold: column(row, "new_phone_fail")?,
            ip_fail_threshold: column(row, "new_ip_fail")?,
            ip_phone_threshold: column(row, "new_ip_phone")?,
            lock_seconds: column(row, "new_lock_seconds")?,
        },
        created_at: column(row, "created_at")?,
    })
}

/// Empty strings in the log table stand for an absent value
fn row_to_unlock(row: &MySqlRow) -> Result<UnlockRecord, DomainError> {
    let optional = |name: &str| -> Result<Option<String>, DomainError> {
        let value: String = column(row, name)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    };
    Ok(UnlockRecord {
        id: column(row, "id")?,
        operator_user_id: column(row, "operator_user_id")?,
        phone: optional("phone")?,
        ip: optional("ip")?,
        reason: optional("reason")?,
        created_at: column(row, "created_at")?,
    })
}
