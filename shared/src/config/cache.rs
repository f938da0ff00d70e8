//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration for the ephemeral risk counters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Whether the cache should be used at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Maximum number of retry attempts per command
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://127.0.0.1:6379"),
            enabled: default_enabled(),
            connection_timeout: 5,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    ///
    /// `REDIS_URL` wins; otherwise the URL is assembled from `REDIS_HOST`,
    /// `REDIS_PORT` and `REDIS_PWD`. `REDIS_ENABLED=false` turns the cache off.
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| {
            let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
            match std::env::var("REDIS_PWD") {
                Ok(password) if !password.is_empty() => {
                    format!("redis://:{}@{}:{}", password, host, port)
                }
                _ => format!("redis://{}:{}", host, port),
            }
        });
        let enabled = std::env::var("REDIS_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);
        let connection_timeout = std::env::var("REDIS_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Self {
            url,
            enabled,
            connection_timeout,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Disable the cache (durable-only mode)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_new() {
        let config = CacheConfig::new("redis://cache:6380");
        assert_eq!(config.url, "redis://cache:6380");
        assert!(config.enabled);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_disabled_cache() {
        assert!(!CacheConfig::disabled().enabled);
    }
}
