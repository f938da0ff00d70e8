//! Redis-backed [`RiskCache`]

use std::sync::Arc;

use async_trait::async_trait;
use sg_core::services::risk::RiskCache;

use super::redis_client::RedisClient;

/// Ephemeral risk counters and lock markers stored in Redis
#[derive(Clone)]
pub struct RedisRiskCache {
    client: Arc<RedisClient>,
}

impl RedisRiskCache {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RiskCache for RedisRiskCache {
    async fn incr_with_window(&self, key: &str, window_seconds: i64) -> Result<i64, String> {
        self.client
            .increment_with_window(key, window_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn set_marker(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), String> {
        let ttl = u64::try_from(ttl_seconds).unwrap_or(1).max(1);
        self.client
            .set_with_expiry(key, value, ttl)
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get(key).await.map_err(|e| e.to_string())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), String> {
        self.client
            .delete_many(keys)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
