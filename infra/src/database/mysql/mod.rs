//! MySQL implementations of the core repository traits

mod audit_repository_impl;
mod login_failure_repository_impl;
mod permission_resolver_impl;
mod refresh_token_repository_impl;
mod risk_config_repository_impl;
mod user_repository_impl;

pub use audit_repository_impl::MySqlAuditSink;
pub use login_failure_repository_impl::MySqlLoginFailureRepository;
pub use permission_resolver_impl::MySqlPermissionResolver;
pub use refresh_token_repository_impl::MySqlRefreshTokenRepository;
pub use risk_config_repository_impl::MySqlRiskConfigRepository;
pub use user_repository_impl::MySqlUserRepository;

use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};

use sg_core::errors::DomainError;

/// Map a query failure to an unavailable database, keeping the operation name
pub(crate) fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(operation, error = %e, "Database query failed");
        DomainError::database(format!("{}: {}", operation, e))
    }
}

/// Read one column, reporting the column name on failure
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}
