//! Cache module for the Redis-backed risk counters

pub mod redis_client;
pub mod risk_cache;


pub use redis_client::RedisClient;
pub use risk_cache::RedisRiskCache;

pub use sg_shared::config::CacheConfig;
