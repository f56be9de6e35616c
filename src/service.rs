//! Read-through airport lookup service
//!
//! `AirportLocator` ties the in-memory cache, the Amadeus client, and the
//! optional disk snapshot together: callers ask for codes, cache hits answer
//! immediately, misses go to the provider, and successful resolutions are
//! merged back into the cache and snapshotted. The locator is built once by
//! the composition root and shared behind an `Arc`; there is no global
//! instance.

use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{LookupCache, SnapshotStore};
use crate::data::{Airport, AmadeusClient, AmadeusError, Resolution};

/// Where a returned record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from the in-memory cache
    Cache,
    /// Fetched from the provider on this request
    Amadeus,
}

/// A located airport together with its source
#[derive(Debug, Clone)]
pub struct Located {
    pub airport: Airport,
    pub source: Source,
}

/// Cache-backed airport resolver
///
/// Reads and writes go through an async `RwLock` so concurrent HTTP
/// handlers can share one locator. Remote lookups run outside the lock.
pub struct AirportLocator {
    cache: RwLock<LookupCache<Airport>>,
    client: AmadeusClient,
    store: Option<SnapshotStore>,
}

impl AirportLocator {
    /// Creates a locator and hydrates the cache from the snapshot store
    ///
    /// Hydration cannot fail: a missing, stale, or corrupt snapshot simply
    /// yields an empty cache and the locator comes up ready.
    pub fn new(
        client: AmadeusClient,
        ttl: chrono::Duration,
        store: Option<SnapshotStore>,
    ) -> Self {
        let mut cache = LookupCache::new(ttl);
        if let Some(ref store) = store {
            let entries = store.load();
            if !entries.is_empty() {
                info!(entries = entries.len(), "Hydrated airport cache from disk");
            }
            cache.restore(entries);
        }

        Self {
            cache: RwLock::new(cache),
            client,
            store,
        }
    }

    /// Whether provider credentials are configured
    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Number of entries currently held, fresh or stale
    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Drops every cached entry and snapshots the now-empty state
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        self.snapshot(&cache);
    }

    /// Resolves a single code, preferring the cache
    ///
    /// # Returns
    /// * `Ok(Some(located))` - record plus whether it came from cache or provider
    /// * `Ok(None)` - the provider knows no such airport
    /// * `Err(AmadeusError)` - provider or auth failure, surfaced to the caller
    pub async fn locate(&self, code: &str) -> Result<Option<Located>, AmadeusError> {
        {
            let cache = self.cache.read().await;
            if let Some(airport) = cache.get(code) {
                debug!(code = %code, "Cache hit");
                return Ok(Some(Located {
                    airport: airport.clone(),
                    source: Source::Cache,
                }));
            }
        }

        debug!(code = %code, "Cache miss, resolving via provider");
        match self.client.resolve_one(code).await? {
            Some(airport) => {
                let mut cache = self.cache.write().await;
                cache.put(&airport.iata_code, airport.clone());
                self.snapshot(&cache);
                Ok(Some(Located {
                    airport,
                    source: Source::Amadeus,
                }))
            }
            None => Ok(None),
        }
    }

    /// Resolves a batch of codes, tolerating per-key failures
    ///
    /// Cache hits and fresh resolutions are combined; codes the provider
    /// does not know or fails on are omitted rather than failing the batch.
    /// Returned order is deduplicated input order for hits, followed by the
    /// freshly resolved codes.
    pub async fn locate_many(&self, codes: &[String]) -> Vec<Airport> {
        let (hits, misses) = {
            let cache = self.cache.read().await;
            cache.get_many(codes)
        };
        debug!(
            hits = hits.len(),
            misses = misses.len(),
            "Batch lookup partitioned"
        );

        let mut results = ordered_hits(codes, &hits);

        if misses.is_empty() {
            return results;
        }

        let resolutions = self.client.resolve_many(&misses).await;
        let mut resolved = Vec::new();
        for resolution in resolutions {
            match resolution {
                Resolution::Found(airport) => resolved.push(airport),
                Resolution::NotFound(code) => {
                    debug!(code = %code, "No provider match for code");
                }
                Resolution::Failed { code, error } => {
                    warn!(code = %code, error = %error, "Dropping failed code from batch");
                }
            }
        }

        if !resolved.is_empty() {
            let mut cache = self.cache.write().await;
            for airport in &resolved {
                cache.put(&airport.iata_code, airport.clone());
            }
            self.snapshot(&cache);
        }

        results.extend(resolved);
        results
    }

    /// Keyword autocomplete, proxied straight to the provider
    ///
    /// Autocomplete results are partial-name matches, so they bypass the
    /// code-keyed cache.
    pub async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Airport>, AmadeusError> {
        self.client.search(keyword, limit).await
    }

    /// Writes the current entry map to disk, ignoring snapshot errors
    fn snapshot(&self, cache: &LookupCache<Airport>) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.save(cache.entries()) {
                warn!(error = %e, "Failed to snapshot airport cache");
            }
        }
    }
}

/// Orders cache hits by first occurrence in the input key list
fn ordered_hits(codes: &[String], hits: &HashMap<String, Airport>) -> Vec<Airport> {
    let mut ordered = Vec::with_capacity(hits.len());
    let mut taken = std::collections::HashSet::new();
    for code in codes {
        let code = code.trim().to_uppercase();
        if let Some(airport) = hits.get(&code) {
            if taken.insert(code) {
                ordered.push(airport.clone());
            }
        }
    }
    ordered
}
