//! Unified cache builder for the bounded eviction policies.
//!
//! Provides a simple API to create single-threaded caches with different
//! eviction policies while hiding the internal `Arc<V>` wrapping. The
//! write-through TTL cache is not built here: it is configured by a sweep
//! period rather than a capacity and owns a background thread, so its
//! constructor stays on [`WriteThroughCache`](crate::policy::write_through::WriteThroughCache).
//!
//! ## Example
//!
//! ```
//! use kvcache::builder::{CacheBuilder, CachePolicy};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::policy::fifo::FifoCore;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::traits::CoreCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// First In, First Out eviction (updates reposition).
    Fifo,
    /// Frequency-tracking eviction (victim chosen by recency).
    Lfu,
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCore<K, V>),
    Fifo(FifoCore<K, V>),
    Lfu(LfuCore<K, V>),
}

/// Unified cache wrapper that provides a consistent API regardless of
/// policy.
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Insert a key-value pair. Returns the previous value if the key
    /// existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let value = Arc::new(value);
        let previous = match &mut self.inner {
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Fifo(fifo) => fifo.insert(key, value),
            CacheInner::Lfu(lfu) => lfu.insert(key, value),
        };
        previous.map(|arc| Arc::try_unwrap(arc).unwrap_or_else(|arc| (*arc).clone()))
    }

    /// Get a reference to a value by key.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let value = match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Fifo(fifo) => fifo.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        };
        value.map(|arc| arc.as_ref())
    }

    /// Check if a key exists without affecting eviction order.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Fifo(fifo) => fifo.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Fifo(fifo) => fifo.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the maximum capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Fifo(fifo) => fifo.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
        }
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Fifo(fifo) => fifo.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
        }
    }
}

/// Builder for creating cache instances.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::builder::{CacheBuilder, CachePolicy};
    ///
    /// let mut lru = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
    /// let mut fifo = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Fifo);
    ///
    /// lru.insert(1, "one".to_string());
    /// fifo.insert(1, "one".to_string());
    /// assert_eq!(lru.len(), fifo.len());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            CachePolicy::Fifo => CacheInner::Fifo(FifoCore::new(self.capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCore::new(self.capacity)),
        };

        Cache { inner }
    }
}
