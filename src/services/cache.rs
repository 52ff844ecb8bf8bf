//! Time-bounded document cache keyed by the raw prompt text

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::log_debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    timestamp: Instant,
}

/// In-memory cache with lazy expiry.
///
/// Entries older than `max_age` are evicted the next time they are read;
/// there is no size bound and no background sweep.
#[derive(Debug, Clone)]
pub struct CacheService {
    entries: HashMap<String, CacheEntry>,
    max_age: Duration,
}

impl CacheService {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache.max_age())
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Cached value for `key`, evicting it if it has expired
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<String> {
        let entry = self.entries.get(key)?;

        if now.saturating_duration_since(entry.timestamp) > self.max_age {
            log_debug!("Cache entry expired for key of {} chars", key.len());
            self.entries.remove(key);
            return None;
        }

        Some(entry.value.clone())
    }

    /// Store `value` under `key`, resetting its timestamp
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set_at(key, value, Instant::now());
    }

    pub fn set_at(&mut self, key: impl Into<String>, value: impl Into<String>, now: Instant) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                timestamp: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheService {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut cache = CacheService::new(Duration::from_secs(60));
        cache.set("a landing page", "<html></html>");
        assert_eq!(cache.get("a landing page").as_deref(), Some("<html></html>"));
        assert_eq!(cache.get("another page"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let start = Instant::now();
        let mut cache = CacheService::new(Duration::from_secs(60));
        cache.set_at("k", "v", start);

        assert_eq!(
            cache.get_at("k", start + Duration::from_secs(60)).as_deref(),
            Some("v")
        );
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get_at("k", start + Duration::from_secs(61)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_resets_timestamp() {
        let start = Instant::now();
        let mut cache = CacheService::new(Duration::from_secs(10));
        cache.set_at("k", "old", start);
        cache.set_at("k", "new", start + Duration::from_secs(8));

        assert_eq!(
            cache.get_at("k", start + Duration::from_secs(15)).as_deref(),
            Some("new")
        );
    }

    #[test]
    fn test_keys_are_not_normalized() {
        let mut cache = CacheService::default();
        cache.set("Blog", "x");
        assert_eq!(cache.get("blog"), None);
        assert_eq!(cache.get(" Blog"), None);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
