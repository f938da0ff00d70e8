//! RBAC lookup for the admin access profile.

use async_trait::async_trait;
use sqlx::MySqlPool;

use sg_core::domain::entities::access::{AccessProfile, RoleBrief};
use sg_core::errors::DomainError;
use sg_core::repositories::PermissionResolver;

use super::{column, db_error};

pub struct MySqlPermissionResolver {
    pool: MySqlPool,
}

impl MySqlPermissionResolver {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionResolver for MySqlPermissionResolver {
    async fn resolve(&self, user_id: &str) -> Result<AccessProfile, DomainError> {
        let role_rows = sqlx::query(
            r#"
            SELECT r.role_key, r.role_name
            FROM rbac_user_roles ur
            JOIN rbac_roles r ON r.id = ur.role_id
            WHERE ur.user_id = ? AND r.status = 'ACTIVE'
            ORDER BY r.role_key ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load user roles"))?;

        let roles = role_rows
            .iter()
            .map(|row| -> Result<RoleBrief, DomainError> {
                Ok(RoleBrief {
                    code: column(row, "role_key")?,
                    name: column(row, "role_name")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let permission_codes: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.code
            FROM rbac_user_roles ur
            JOIN rbac_roles r ON r.id = ur.role_id
            JOIN rbac_role_permissions rp ON rp.role_id = r.id
            JOIN rbac_permissions p ON p.code = rp.permission_code
            WHERE ur.user_id = ? AND r.status = 'ACTIVE' AND p.status = 'ACTIVE'
            ORDER BY p.code ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load user permissions"))?;

        Ok(AccessProfile {
            user_id: user_id.to_string(),
            roles,
            permission_codes,
        })
    }
}
