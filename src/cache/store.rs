//! Cache Store Module
//!
//! Key to entry map with lazy TTL expiry and global invalidation.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// In-memory response cache keyed by `METHOD:url`.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries live `default_ttl` unless told otherwise.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get ==
    /// Returns the cached value if present and not expired.
    ///
    /// An expired entry is removed as a side effect and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores a value, unconditionally replacing any existing entry.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The payload to cache
    /// * `ttl` - Lifetime of the entry (uses default_ttl if None)
    pub fn set(&mut self, key: String, value: Value, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Invalidate All ==
    /// Empties the whole store. Returns how many entries were dropped.
    pub fn invalidate_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidation();
        self.stats.set_total_entries(0);
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before - self.entries.len();

        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(30);

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_ttl(), TTL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_set_and_get() {
        let mut store = CacheStore::new(TTL);

        store.set("GET:/clients".to_string(), json!([{"id": 1}]), None);

        assert_eq!(store.get("GET:/clients"), Some(json!([{"id": 1}])));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(TTL);
        assert!(store.get("GET:/nothing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_overwrite() {
        let mut store = CacheStore::new(TTL);

        store.set("k".to_string(), json!(1), None);
        store.set("k".to_string(), json!(2), None);

        assert_eq!(store.get("k"), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_overwrite_resets_ttl() {
        let mut store = CacheStore::new(TTL);

        store.set("k".to_string(), json!(1), Some(Duration::from_secs(1)));
        tokio::time::advance(Duration::from_millis(800)).await;
        store.set("k".to_string(), json!(2), Some(Duration::from_secs(1)));
        tokio::time::advance(Duration::from_millis(800)).await;

        assert_eq!(store.get("k"), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration_removes_entry() {
        let mut store = CacheStore::new(TTL);

        store.set("k".to_string(), json!("v"), Some(Duration::from_secs(1)));
        assert!(store.get("k").is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(store.get("k").is_none());
        assert!(store.is_empty(), "Expired entry should be deleted on access");
        assert_eq!(store.stats().expired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_default_ttl_applies() {
        let mut store = CacheStore::new(Duration::from_secs(2));

        store.set("k".to_string(), json!("v"), None);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("k").is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(store.get("k").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_invalidate_all() {
        let mut store = CacheStore::new(TTL);

        store.set("GET:/a".to_string(), json!(1), None);
        store.set("GET:/b".to_string(), json!(2), None);

        assert_eq!(store.invalidate_all(), 2);
        assert!(store.is_empty());
        assert!(store.get("GET:/a").is_none());
        assert!(store.get("GET:/b").is_none());
        assert_eq!(store.stats().invalidations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_stats() {
        let mut store = CacheStore::new(TTL);

        store.set("k".to_string(), json!("v"), None);
        store.get("k"); // hit
        store.get("missing"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(TTL);

        store.set("short".to_string(), json!(1), Some(Duration::from_secs(1)));
        store.set("long".to_string(), json!(2), Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }
}
