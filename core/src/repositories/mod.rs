pub mod access;
pub mod audit;
pub mod risk;
pub mod token;
pub mod user;

pub use access::PermissionResolver;
pub use audit::AuditSink;
pub use risk::{LoginFailureRepository, RiskConfigRepository};
pub use token::RefreshTokenRepository;
pub use user::UserRepository;

#[cfg(any(test, feature = "test-util"))]
pub use access::MockPermissionResolver;
#[cfg(any(test, feature = "test-util"))]
pub use audit::MockAuditSink;
#[cfg(any(test, feature = "test-util"))]
pub use risk::{MockLoginFailureRepository, MockRiskConfigRepository};
#[cfg(any(test, feature = "test-util"))]
pub use token::MockRefreshTokenRepository;
#[cfg(any(test, feature = "test-util"))]
pub use user::MockUserRepository;
