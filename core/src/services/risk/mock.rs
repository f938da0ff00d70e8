//! In-memory risk cache with simulated expiry

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::traits::RiskCache;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Mock cache; the mutex makes each increment atomic like `INCR`
#[derive(Clone, Default)]
pub struct MockRiskCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockRiskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the cache were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Drop every entry whose TTL would have elapsed by `at`
    pub fn expire_until(&self, at: DateTime<Utc>) {
        self.entries
            .lock()
            .unwrap()
            .retain(|_, e| e.expires_at.map_or(true, |exp| exp > at));
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|e| e.value.clone())
    }

    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.lock().unwrap().get(key).and_then(|e| e.expires_at)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Write a raw value, for seeding malformed markers
    pub fn put(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    fn check(&self) -> Result<(), String> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err("mock cache offline".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl RiskCache for MockRiskCache {
    async fn incr_with_window(&self, key: &str, window_seconds: i64) -> Result<i64, String> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        let next = entry.value.parse::<i64>().map_err(|e| e.to_string())? + 1;
        entry.value = next.to_string();
        if next == 1 {
            entry.expires_at = Some(Utc::now() + Duration::seconds(window_seconds));
        }
        Ok(next)
    }

    async fn set_marker(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), String> {
        self.check()?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Utc::now() + Duration::seconds(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.check()?;
        Ok(self.value(key))
    }

    async fn delete(&self, keys: &[String]) -> Result<(), String> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
