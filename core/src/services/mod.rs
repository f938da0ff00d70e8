//! Business services containing domain logic and use cases.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod password;
pub mod risk;
pub mod token;

// Re-export commonly used types
pub use admin::{RiskAdminService, UnlockRequest};
pub use audit::{AuditService, AuditServiceConfig};
pub use auth::{AuthService, AuthServiceConfig};
pub use password::{PasswordMatch, PasswordVerifier};
pub use risk::{FailureOutcome, LoginRiskGuard, RiskCache, RiskConfigLoader};
pub use token::{TokenCleanupConfig, TokenCleanupService, TokenIssuer, TokenIssuerConfig};
