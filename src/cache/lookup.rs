//! In-memory TTL lookup cache
//!
//! Provides a `LookupCache` that maps uppercase-normalized string keys to
//! fetched records with a per-entry freshness window. Entries past the TTL
//! behave as absent on read but are not proactively purged, so a later
//! overwrite reuses the slot and callers can inspect the raw entry set.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single cached record with the time it was fetched from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The cached record
    pub value: V,
    /// When the record was fetched
    pub fetched_at: DateTime<Utc>,
}

/// In-memory key/value cache with a fixed freshness window
///
/// Keys are uppercased before storage and lookup so mixed-case callers
/// (e.g. "cdg" vs "CDG") hit the same entry. The cache is unbounded and has
/// no eviction beyond TTL staleness; stale entries are ignored on read and
/// overwritten on the next successful fetch.
#[derive(Debug)]
pub struct LookupCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> LookupCache<V> {
    /// Creates an empty cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Returns the freshness window this cache was created with
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries physically present, fresh or stale
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a fresh value for `key`
    ///
    /// Returns `None` when the key is unknown or its entry is older than the
    /// TTL. Stale entries are left in place rather than deleted.
    pub fn get(&self, key: &str) -> Option<&V> {
        let entry = self.entries.get(&normalize(key))?;
        if self.is_fresh(entry) {
            Some(&entry.value)
        } else {
            None
        }
    }

    /// Stores `value` under `key`, stamped with the current time
    ///
    /// Any prior entry is overwritten unconditionally (last write wins).
    pub fn put(&mut self, key: &str, value: V) {
        self.entries.insert(
            normalize(key),
            CacheEntry {
                value,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Partitions `keys` into cache hits and misses in a single pass
    ///
    /// Duplicate keys collapse (set semantics); `misses` preserves the order
    /// of first occurrence in the input. A key never appears in both
    /// partitions, and together they cover the deduplicated input set.
    pub fn get_many(&self, keys: &[String]) -> (HashMap<String, V>, Vec<String>) {
        let mut hits = HashMap::new();
        let mut misses = Vec::new();
        let mut seen = HashSet::new();

        for key in keys {
            let key = normalize(key);
            if !seen.insert(key.clone()) {
                continue;
            }
            match self.get(&key) {
                Some(value) => {
                    hits.insert(key, value.clone());
                }
                None => misses.push(key),
            }
        }

        (hits, misses)
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the raw entry map, including stale entries, for snapshotting
    pub fn entries(&self) -> &HashMap<String, CacheEntry<V>> {
        &self.entries
    }

    /// Replaces the entry map wholesale, used when hydrating from a snapshot
    ///
    /// Restored entries keep their original `fetched_at` stamps, so entries
    /// that were already stale when saved stay invisible to `get`.
    pub fn restore(&mut self, entries: HashMap<String, CacheEntry<V>>) {
        self.entries = entries;
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        Utc::now() - entry.fetched_at < self.ttl
    }
}

/// Uppercases a key so lookups are case-insensitive
fn normalize(key: &str) -> String {
    key.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_cache() -> LookupCache<String> {
        LookupCache::new(Duration::hours(24))
    }

    #[test]
    fn test_put_then_get_returns_value() {
        let mut cache = day_cache();
        cache.put("CDG", "Paris".to_string());

        assert_eq!(cache.get("CDG"), Some(&"Paris".to_string()));
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let mut cache = day_cache();
        cache.put("cdg", "Paris".to_string());

        assert_eq!(cache.get("CDG"), Some(&"Paris".to_string()));
        assert_eq!(cache.get("cdg"), Some(&"Paris".to_string()));
        assert_eq!(cache.len(), 1, "Mixed-case writes should share a slot");
    }

    #[test]
    fn test_get_misses_unknown_key() {
        let cache = day_cache();
        assert!(cache.get("JFK").is_none());
    }

    #[test]
    fn test_stale_entry_behaves_as_miss_but_stays_present() {
        let mut cache = LookupCache::new(Duration::zero());
        cache.put("CDG", "Paris".to_string());

        assert!(cache.get("CDG").is_none(), "Zero TTL entry should read as a miss");
        assert_eq!(cache.len(), 1, "Stale entry should not be purged on read");
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let mut cache = day_cache();
        cache.put("CDG", "first".to_string());
        cache.put("CDG", "second".to_string());

        assert_eq!(cache.get("CDG"), Some(&"second".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_many_partitions_hits_and_misses() {
        let mut cache = day_cache();
        cache.put("CDG", "Paris".to_string());

        let keys = vec!["CDG".to_string(), "JFK".to_string(), "YVR".to_string()];
        let (hits, misses) = cache.get_many(&keys);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits.get("CDG"), Some(&"Paris".to_string()));
        assert_eq!(misses, vec!["JFK".to_string(), "YVR".to_string()]);
    }

    #[test]
    fn test_get_many_collapses_duplicates_preserving_miss_order() {
        let mut cache = day_cache();
        cache.put("CDG", "Paris".to_string());

        let keys = vec![
            "CDG".to_string(),
            "CDG".to_string(),
            "JFK".to_string(),
            "jfk".to_string(),
        ];
        let (hits, misses) = cache.get_many(&keys);

        assert_eq!(hits.len(), 1);
        assert_eq!(misses, vec!["JFK".to_string()], "Duplicates should collapse");
    }

    #[test]
    fn test_get_many_partitions_are_disjoint_and_cover_input() {
        let mut cache = day_cache();
        cache.put("CDG", "Paris".to_string());
        cache.put("YVR", "Vancouver".to_string());

        let keys = vec!["CDG".to_string(), "JFK".to_string(), "YVR".to_string()];
        let (hits, misses) = cache.get_many(&keys);

        for key in &misses {
            assert!(!hits.contains_key(key), "{} in both partitions", key);
        }
        assert_eq!(hits.len() + misses.len(), 3);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut cache = day_cache();
        cache.put("CDG", "Paris".to_string());
        cache.put("JFK", "New York".to_string());

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("CDG").is_none());
    }

    #[test]
    fn test_restore_keeps_original_timestamps() {
        let mut cache = day_cache();
        let mut entries = HashMap::new();
        entries.insert(
            "CDG".to_string(),
            CacheEntry {
                value: "Paris".to_string(),
                fetched_at: Utc::now() - Duration::hours(48),
            },
        );
        entries.insert(
            "JFK".to_string(),
            CacheEntry {
                value: "New York".to_string(),
                fetched_at: Utc::now(),
            },
        );

        cache.restore(entries);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("CDG").is_none(), "48h-old entry should read stale");
        assert_eq!(cache.get("JFK"), Some(&"New York".to_string()));
    }
}
