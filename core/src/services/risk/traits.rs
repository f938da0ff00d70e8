//! Ephemeral counter store used by the login-risk guard

use async_trait::async_trait;

/// Cache operations the risk guard needs
///
/// Every method is a single network round trip. Errors are plain strings,
/// mapped to `DomainError::DependencyUnavailable` by the caller.
#[async_trait]
pub trait RiskCache: Send + Sync {
    /// Atomically increment `key` and return the new value.
    /// On the first increment (result 1) the key expires after `window_seconds`;
    /// later increments leave the expiry untouched.
    async fn incr_with_window(&self, key: &str, window_seconds: i64) -> Result<i64, String>;

    /// Set `key` to `value` with a fresh expiry
    async fn set_marker(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), String>;

    /// Read a key; `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Delete keys; missing keys are ignored
    async fn delete(&self, keys: &[String]) -> Result<(), String>;
}
