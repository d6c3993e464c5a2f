//! Request cache keyed by endpoint and parameters
//!
//! Provides a `RequestCache` that keeps serializable payloads in memory with
//! the time they were captured, evicting entries lazily once they outlive the
//! configured TTL.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Default time-to-live for cached responses, in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Query parameters that never take part in a cache key
const SECRET_PARAMS: &[&str] = &["api_key"];

/// A cached payload and the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached data, kept as JSON so one cache can hold any response type
    data: Value,
    /// When the data was cached
    cached_at: DateTime<Utc>,
}

/// Process-local cache of catalog responses
///
/// Entries older than the TTL are treated as absent and removed on the read
/// that finds them. There is no size bound.
#[derive(Debug)]
pub struct RequestCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCache {
    /// Creates an empty cache with the default 5 minute TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Creates an empty cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry behind.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reads a fresh entry
    ///
    /// # Returns
    /// * `Some(T)` if the key was set less than one TTL ago and still decodes as `T`
    /// * `None` if the key is missing, expired (the entry is evicted), or of another type
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Stores `data` under `key`, replacing any previous entry
    ///
    /// Payloads that cannot be serialized are not cached.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_at(key, data, Utc::now());
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let mut entries = self.entries();
        let entry = entries.get(key)?;

        if now - entry.cached_at > self.ttl {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        serde_json::from_value(entry.data.clone()).ok()
    }

    fn set_at<T: Serialize>(&self, key: &str, data: &T, now: DateTime<Utc>) {
        match serde_json::to_value(data) {
            Ok(data) => {
                self.entries().insert(
                    key.to_string(),
                    CacheEntry {
                        data,
                        cached_at: now,
                    },
                );
            }
            Err(e) => tracing::warn!(key, error = %e, "payload not cacheable"),
        }
    }
}

/// Builds a cache key from an endpoint path and its query parameters.
///
/// Parameters are sorted so their order does not matter, and the API key is
/// left out so rotating it does not change cache identity.
pub fn cache_key(path: &str, params: &[(&str, String)]) -> String {
    let mut parts: Vec<String> = params
        .iter()
        .filter(|(name, _)| !SECRET_PARAMS.contains(name))
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    parts.sort();

    if parts.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn batman_results() -> Vec<TestData> {
        ["Batman", "Batman Returns", "Batman Begins"]
            .iter()
            .enumerate()
            .map(|(i, name)| TestData {
                name: name.to_string(),
                value: i as i32,
            })
            .collect()
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let cache = RequestCache::new();

        let result: Option<TestData> = cache.get("nonexistent_key");

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_get_returns_payload_within_ttl() {
        let cache = RequestCache::new();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache.set("fresh_key", &data);

        assert_eq!(cache.get::<TestData>("fresh_key"), Some(data));
    }

    #[test]
    fn test_ttl_boundary_scenario() {
        let cache = RequestCache::with_ttl(Duration::minutes(5));
        let t0 = Utc::now();

        cache.set_at("q=batman", &batman_results(), t0);

        let before_expiry = t0 + Duration::minutes(4) + Duration::seconds(59);
        let hit: Option<Vec<TestData>> = cache.get_at("q=batman", before_expiry);
        assert_eq!(hit.map(|r| r.len()), Some(3));

        let after_expiry = t0 + Duration::minutes(5) + Duration::seconds(1);
        let miss: Option<Vec<TestData>> = cache.get_at("q=batman", after_expiry);
        assert!(miss.is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = RequestCache::with_ttl(Duration::minutes(5));
        let t0 = Utc::now();
        cache.set_at("stale", &1u32, t0);
        assert_eq!(cache.len(), 1);

        let _: Option<u32> = cache.get_at("stale", t0 + Duration::minutes(6));
        assert!(cache.is_empty(), "Expired entry should be removed");

        let later = t0 + Duration::minutes(7);
        cache.set_at("stale", &2u32, later);
        assert_eq!(cache.get_at::<u32>("stale", later + Duration::seconds(1)), Some(2));
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let cache = RequestCache::with_ttl(Duration::minutes(5));
        let t0 = Utc::now();
        cache.set_at("key", &"first", t0);
        cache.set_at("key", &"second", t0 + Duration::minutes(4));

        let read = cache.get_at::<String>("key", t0 + Duration::minutes(8));
        assert_eq!(read.as_deref(), Some("second"));
    }

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let cache = RequestCache::new();
        cache.set("number", &42u32);

        assert!(cache.get::<TestData>("number").is_none());
        assert_eq!(cache.get::<u32>("number"), Some(42));
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = RequestCache::new();
        cache.set("a", &1u32);
        cache.set("b", &2u32);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get::<u32>("a").is_none());
    }

    #[test]
    fn test_cache_key_ignores_param_order_and_api_key() {
        let a = cache_key(
            "/search/movie",
            &[
                ("api_key", "secret-1".to_string()),
                ("query", "batman".to_string()),
                ("page", "1".to_string()),
            ],
        );
        let b = cache_key(
            "/search/movie",
            &[
                ("page", "1".to_string()),
                ("query", "batman".to_string()),
                ("api_key", "secret-2".to_string()),
            ],
        );

        assert_eq!(a, b);
        assert_eq!(a, "/search/movie?page=1&query=batman");
    }

    #[test]
    fn test_cache_key_without_params_is_path() {
        assert_eq!(cache_key("/movie/155", &[]), "/movie/155");
    }
}
