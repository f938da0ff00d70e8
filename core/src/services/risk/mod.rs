//! Login-risk control
//!
//! Three independent dimensions guard the login path:
//! - phone: durable counter and lock in the relational store
//! - ip: ephemeral counter and lock marker in the cache
//! - ip+phone: ephemeral counter and lock marker in the cache
//!
//! Thresholds come from [`RiskConfigLoader`] on every request.

mod config_loader;
mod guard;
pub mod keys;
mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config_loader::RiskConfigLoader;
pub use guard::{FailureOutcome, LoginRiskGuard};
pub use traits::RiskCache;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockRiskCache;
