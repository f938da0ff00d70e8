//! Domain entities representing core business objects.

pub mod access;
pub mod audit;
pub mod risk;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use access::{AccessProfile, RoleBrief};
pub use audit::{AuditAction, AuditEvent, AuditStatus};
pub use risk::{
    FailurePolicy, LockStatus, LockType, LoginFailure, RiskConfigChange, UnlockLogFilter,
    UnlockRecord,
};
pub use token::{
    Claims, RefreshTokenRecord, RefreshTokenState, TokenType,
    ACCESS_TOKEN_TTL_SECONDS, REFRESH_TOKEN_TTL_SECONDS,
};
pub use user::{Role, User, STATUS_ACTIVE};
