//! TTL query cache over moka.
//!
//! Read-through only: a hit short-circuits the backend entirely, and
//! inserts never invalidate cached queries. Staleness is bounded purely
//! by the TTL, a documented consistency trade-off.

use std::time::Duration;

use moka::sync::Cache;

use argus_core::features::FeatureType;
use argus_core::models::SearchResult;

/// Memoizes per-feature search results keyed by a blake3 digest of the
/// full query identity: feature type, vector bytes, top-k, and filter.
pub struct QueryCache {
    cache: Cache<String, Vec<SearchResult>>,
}

impl QueryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Digest identifying one query. Equal queries hash equal; any
    /// changed component (vector, k, filter) yields a different key.
    pub fn key(
        feature_type: FeatureType,
        vector: &[f32],
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(feature_type.label().as_bytes());
        for value in vector {
            hasher.update(&value.to_le_bytes());
        }
        hasher.update(&(top_k as u64).to_le_bytes());
        if let Some(filter) = filter {
            hasher.update(filter.to_string().as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        self.cache.get(key)
    }

    pub fn set(&self, key: String, results: Vec<SearchResult>) {
        self.cache.insert(key, results);
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl_cache(ttl_ms: u64) -> QueryCache {
        QueryCache::new(64, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn hit_returns_cached_results() {
        let cache = ttl_cache(60_000);
        let key = QueryCache::key(FeatureType::Cnn, &[0.1, 0.2], 10, None);
        cache.set(key.clone(), vec![SearchResult::new("a", 0.5)]);
        let hit = cache.get(&key).unwrap();
        assert_eq!(hit[0].id, "a");
    }

    #[test]
    fn keys_differ_by_every_component() {
        let base = QueryCache::key(FeatureType::Cnn, &[0.1, 0.2], 10, None);
        assert_ne!(
            base,
            QueryCache::key(FeatureType::Motion, &[0.1, 0.2], 10, None)
        );
        assert_ne!(base, QueryCache::key(FeatureType::Cnn, &[0.1, 0.3], 10, None));
        assert_ne!(base, QueryCache::key(FeatureType::Cnn, &[0.1, 0.2], 20, None));
        assert_ne!(
            base,
            QueryCache::key(
                FeatureType::Cnn,
                &[0.1, 0.2],
                10,
                Some(&serde_json::json!({"content_id": "x"}))
            )
        );
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = ttl_cache(20);
        let key = QueryCache::key(FeatureType::Cnn, &[1.0], 5, None);
        cache.set(key.clone(), vec![SearchResult::new("a", 0.0)]);
        assert!(cache.get(&key).is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn invalidate_removes_single_entry() {
        let cache = ttl_cache(60_000);
        let a = QueryCache::key(FeatureType::Cnn, &[1.0], 5, None);
        let b = QueryCache::key(FeatureType::Cnn, &[2.0], 5, None);
        cache.set(a.clone(), vec![]);
        cache.set(b.clone(), vec![]);

        cache.invalidate(&a);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
    }
}
