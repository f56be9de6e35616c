//! Disk snapshot store for the lookup cache
//!
//! Persists the full entry map to JSON files in an XDG-compliant cache
//! directory so a restarted process starts warm. The snapshot uses two files
//! under a fixed namespace: one holding the serialized entries and one
//! holding the last-save timestamp. On load, a snapshot whose save stamp is
//! older than the TTL is discarded wholesale; this whole-batch check is
//! separate from the per-entry freshness check in `LookupCache` and both are
//! kept (see DESIGN.md).

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::lookup::CacheEntry;

/// File holding the serialized entry map
const ENTRIES_FILE: &str = "airport_locations.json";

/// File holding the timestamp of the last save
const SAVED_AT_FILE: &str = "airport_locations_saved_at.json";

/// Reads and writes cache snapshots under a fixed directory
///
/// A malformed or missing snapshot never fails a load; it falls back to an
/// empty entry map so the service always reaches a ready state.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Directory where snapshot files are stored
    dir: PathBuf,
    /// Maximum age of a snapshot before it is discarded on load
    ttl: Duration,
}

impl SnapshotStore {
    /// Creates a store in the XDG cache directory (e.g. `~/.cache/aerodex/`)
    ///
    /// Returns `None` if the platform cache directory cannot be determined.
    pub fn new(ttl: Duration) -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "aerodex")?;
        Some(Self {
            dir: project_dirs.cache_dir().to_path_buf(),
            ttl,
        })
    }

    /// Creates a store over a specific directory
    ///
    /// Useful for testing or when a custom cache location is configured.
    pub fn with_dir(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    fn entries_path(&self) -> PathBuf {
        self.dir.join(ENTRIES_FILE)
    }

    fn saved_at_path(&self) -> PathBuf {
        self.dir.join(SAVED_AT_FILE)
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Writes the full entry map and a fresh save stamp to disk
    ///
    /// Every entry is written with its original `fetched_at`, regardless of
    /// freshness; staleness is re-evaluated on load and on read.
    pub fn save<V: Serialize>(
        &self,
        entries: &HashMap<String, CacheEntry<V>>,
    ) -> std::io::Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.entries_path(), json)?;

        let stamp = serde_json::to_string(&Utc::now())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.saved_at_path(), stamp)
    }

    /// Reads the snapshot back, or an empty map when it is unusable
    ///
    /// Returns empty when the snapshot files are missing, when either file
    /// fails to parse, or when the save stamp is older than the TTL. Never
    /// returns an error; corrupt state resets silently.
    pub fn load<V: DeserializeOwned>(&self) -> HashMap<String, CacheEntry<V>> {
        match self.try_load() {
            Some(entries) => entries,
            None => HashMap::new(),
        }
    }

    fn try_load<V: DeserializeOwned>(&self) -> Option<HashMap<String, CacheEntry<V>>> {
        let stamp_raw = fs::read_to_string(self.saved_at_path()).ok()?;
        let saved_at: DateTime<Utc> = serde_json::from_str(&stamp_raw).ok()?;
        if Utc::now() - saved_at >= self.ttl {
            return None;
        }

        let entries_raw = fs::read_to_string(self.entries_path()).ok()?;
        serde_json::from_str(&entries_raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(value: &str, age: Duration) -> CacheEntry<String> {
        CacheEntry {
            value: value.to_string(),
            fetched_at: Utc::now() - age,
        }
    }

    fn create_test_store(ttl: Duration) -> (SnapshotStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SnapshotStore::with_dir(temp_dir.path().to_path_buf(), ttl);
        (store, temp_dir)
    }

    #[test]
    fn test_save_writes_both_snapshot_files() {
        let (store, temp_dir) = create_test_store(Duration::hours(24));
        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::zero()));

        store.save(&entries).expect("Save should succeed");

        assert!(temp_dir.path().join(ENTRIES_FILE).exists());
        assert!(temp_dir.path().join(SAVED_AT_FILE).exists());
    }

    #[test]
    fn test_round_trip_restores_equivalent_entries() {
        let (store, _temp_dir) = create_test_store(Duration::hours(24));
        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::hours(1)));
        entries.insert("JFK".to_string(), entry("New York", Duration::zero()));

        store.save(&entries).expect("Save should succeed");
        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_load_returns_empty_when_no_snapshot_exists() {
        let (store, _temp_dir) = create_test_store(Duration::hours(24));

        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_discards_whole_batch_past_ttl() {
        let (store, _temp_dir) = create_test_store(Duration::zero());
        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::zero()));

        store.save(&entries).expect("Save should succeed");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert!(loaded.is_empty(), "Expired snapshot should be discarded");
    }

    #[test]
    fn test_load_survives_malformed_entries_file() {
        let (store, temp_dir) = create_test_store(Duration::hours(24));
        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::zero()));
        store.save(&entries).expect("Save should succeed");

        fs::write(temp_dir.path().join(ENTRIES_FILE), "{not json").expect("Should write");
        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert!(loaded.is_empty(), "Corrupt snapshot should reset to empty");
    }

    #[test]
    fn test_load_survives_malformed_stamp_file() {
        let (store, temp_dir) = create_test_store(Duration::hours(24));
        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::zero()));
        store.save(&entries).expect("Save should succeed");

        fs::write(temp_dir.path().join(SAVED_AT_FILE), "yesterday-ish").expect("Should write");
        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_ignores_entry_freshness() {
        let (store, _temp_dir) = create_test_store(Duration::hours(24));
        let mut entries = HashMap::new();
        // Entry older than the TTL still gets written and restored; the
        // per-entry check happens at read time in the cache, not here.
        entries.insert("CDG".to_string(), entry("Paris", Duration::hours(48)));

        store.save(&entries).expect("Save should succeed");
        let loaded: HashMap<String, CacheEntry<String>> = store.load();

        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let store = SnapshotStore::with_dir(nested.clone(), Duration::hours(24));

        let mut entries = HashMap::new();
        entries.insert("CDG".to_string(), entry("Paris", Duration::zero()));
        store.save(&entries).expect("Save should succeed");

        assert!(nested.join(ENTRIES_FILE).exists());
    }

    #[test]
    fn test_new_uses_project_cache_path() {
        if let Some(store) = SnapshotStore::new(Duration::hours(24)) {
            let path_str = store.dir.to_string_lossy().to_string();
            assert!(
                path_str.contains("aerodex"),
                "Snapshot path should contain project name"
            );
        }
        // Passes if new() returns None (e.g. no home directory in CI)
    }
}
