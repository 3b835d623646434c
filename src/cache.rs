//! LRU cache of decoded buckets.
//!
//! Hot cells are decoded once and then served from here. The cache is purely
//! an accelerator: the storage engine stays authoritative, and dropping or
//! rebuilding the cache loses no data. Write paths refresh entries only
//! after their transaction has committed; read paths fill it lazily on miss.

use lru::LruCache;
use parking_lot::RwLock;
use s2::cellid::CellID;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::bucket::CellBucket;

/// Default number of decoded buckets retained.
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// Thread-safe bounded LRU of decoded buckets, keyed by raw cell id.
pub struct BucketCache {
    inner: RwLock<LruCache<u64, Arc<CellBucket>>>,
}

impl BucketCache {
    /// Create a cache holding at most `capacity` decoded buckets.
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("capacity must be > 0");
        Self {
            inner: RwLock::new(LruCache::new(cap)),
        }
    }

    /// Create a cache with the default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Get a decoded bucket if present.
    ///
    /// This promotes the entry to most-recently-used.
    pub fn get(&self, cell: CellID) -> Option<Arc<CellBucket>> {
        self.inner.write().get(&cell.0).cloned()
    }

    /// Insert a decoded bucket, keyed by its owning cell.
    ///
    /// Evicts the least-recently-used entry at capacity.
    pub fn put(&self, bucket: Arc<CellBucket>) {
        self.inner.write().put(bucket.cell, bucket);
    }

    /// Drop the entry for a cell if present.
    pub fn invalidate(&self, cell: CellID) {
        self.inner.write().pop(&cell.0);
    }

    /// Number of cached buckets.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Maximum number of buckets retained.
    pub fn capacity(&self) -> usize {
        self.inner.read().cap().get()
    }
}

impl Default for BucketCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
