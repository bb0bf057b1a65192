//! Cache Module
//!
//! Process-wide, in-memory memoization of GET responses with per-entry TTL.
//! There is no capacity bound and no LRU: entries leave the store when they
//! expire or when any write request wipes it.

mod entry;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache store shared between the client and the background sweeper.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store for sharing across tasks.
pub fn shared(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
