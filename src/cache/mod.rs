//! Caching layer: in-memory TTL lookups plus disk snapshots
//!
//! This module provides the in-memory `LookupCache` used on every request
//! and the `SnapshotStore` that persists its entries across restarts. Both
//! apply the same configurable TTL, but independently: the cache checks each
//! entry's age on read, while the store discards an entire snapshot whose
//! save stamp is too old.

mod lookup;
mod store;

pub use lookup::{CacheEntry, LookupCache};
pub use store::SnapshotStore;
