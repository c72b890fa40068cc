//! Least Recently Used (LRU) cache.
//!
//! Evicts the entry that has gone longest without being touched, where a
//! touch is either a hit ([`get`](CoreCache::get)) or a write
//! ([`insert`](CoreCache::insert)).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           LruCore<K, V>                              │
//! │                                                                      │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  index: FxHashMap<K, SlotId>                               │    │
//! │   └───────────────┬────────────┬────────────┬──────────────────┘    │
//! │                   │            │            │                       │
//! │                   ▼            ▼            ▼                       │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  order: OrderList<Entry { key, value }>                    │    │
//! │   │                                                            │    │
//! │   │  head ──► [MRU] ◄──► [ .. ] ◄──► [LRU] ◄── tail            │    │
//! │   └────────────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: `index.len() == order.len()` at all times; every indexed key
//! owns exactly one live slot and vice versa. `index.len() <= capacity`
//! holds on return from every operation.
//!
//! ## Operations Flow
//!
//! ```text
//!   put(existing): move node to head, replace value. No eviction.
//!   put(new):      push at head; if len > capacity, unlink tail and
//!                  drop its index entry.
//!   get(hit):      move node to head, return value.
//!   get(miss):     None. No side effects.
//! ```
//!
//! ## Key Components
//!
//! | Component        | Description                                      |
//! |------------------|--------------------------------------------------|
//! | `LruCore<K, V>`  | Single-threaded core: index + order list         |
//! | `LruCache<K, V>` | Thread-safe wrapper, `parking_lot::Mutex`        |
//!
//! ## Concurrency Model
//!
//! Every operation on [`LruCache`] takes one exclusive critical section:
//! a hit mutates recency order, so even reads need the lock exclusively.
//! Lock hold time is a bounded sequence of map/list operations, O(1) per
//! call except `clear` (O(n)) and `recency_rank` (O(n)).
//!
//! ## Example Usage
//!
//! ```
//! use kvcache::policy::lru::LruCache;
//!
//! let cache: LruCache<String, String> = LruCache::new(2);
//! cache.put("a".into(), "1".into());
//! cache.put("b".into(), "2".into());
//!
//! // Touch "a" so "b" becomes the eviction candidate
//! assert_eq!(cache.get(&"a".into()).as_deref(), Some(&"1".to_string()));
//!
//! cache.put("c".into(), "3".into()); // evicts "b"
//! assert!(cache.get(&"b".into()).is_none());
//! assert!(cache.get(&"a".into()).is_some());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{OrderList, SlotId};
use crate::error::ConfigError;
use crate::traits::{ConcurrentCache, CoreCache, LruCacheTrait, MutableCache};

struct Entry<K, V> {
    key: K,
    value: Arc<V>,
}

/// Single-threaded LRU cache core.
///
/// Thread safety is provided by the [`LruCache`] wrapper.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use kvcache::policy::lru::LruCore;
/// use kvcache::traits::CoreCache;
///
/// let mut cache: LruCore<u32, String> = LruCore::new(100);
/// cache.insert(1, Arc::new("page".to_string()));
/// assert_eq!(cache.len(), 1);
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    order: OrderList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LRU cache core with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries (every
    /// insert is a no-op); use [`try_new`](Self::try_new) to reject that
    /// at construction instead.
    pub fn new(capacity: usize) -> Self {
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderList::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a new LRU cache core, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be at least 1"));
        }
        Ok(Self::new(capacity))
    }

    /// Read-only lookup without updating recency order.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use kvcache::policy::lru::LruCore;
    /// use kvcache::traits::CoreCache;
    ///
    /// let mut cache: LruCore<u32, &str> = LruCore::new(2);
    /// cache.insert(1, Arc::new("first"));
    /// cache.insert(2, Arc::new("second"));
    ///
    /// // Peek leaves key 1 as the eviction candidate
    /// assert_eq!(cache.peek(&1).as_deref(), Some(&"first"));
    /// cache.insert(3, Arc::new("third"));
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let &id = self.index.get(key)?;
        self.order.get(id).map(|entry| Arc::clone(&entry.value))
    }

    /// Unlinks the tail entry and drops its index mapping.
    fn evict_tail(&mut self) -> Option<(K, Arc<V>)> {
        let id = self.order.back_id()?;
        let entry = self.order.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn debug_validate_invariants(&self) {
        self.order.debug_validate_invariants();
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.index.len() <= self.capacity);
        for (key, &id) in &self.index {
            let entry = self.order.get(id).expect("indexed slot missing from order list");
            assert!(entry.key == *key, "index key does not match slot key");
        }
    }
}

impl<K, V> CoreCache<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        if let Some(&id) = self.index.get(&key) {
            self.order.move_to_front(id);
            let previous = self
                .order
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));

            #[cfg(debug_assertions)]
            self.debug_validate_invariants();

            return previous;
        }

        // A zero-capacity cache accepts nothing.
        if self.capacity == 0 {
            return None;
        }

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        if self.index.len() > self.capacity {
            self.evict_tail();
        }

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        None
    }

    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        let &id = self.index.get(key)?;
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let id = self.index.remove(key)?;
        let entry = self.order.remove(id);

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        entry.map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, Arc<V>)> {
        let popped = self.evict_tail();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        popped
    }

    fn peek_lru(&self) -> Option<(&K, &Arc<V>)> {
        let id = self.order.back_id()?;
        self.order.get(id).map(|entry| (&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.order.move_to_front(id),
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let &target = self.index.get(key)?;
        self.order.iter_ids().position(|id| id == target)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

/// Thread-safe LRU cache.
///
/// Shares one [`LruCore`] behind a `parking_lot::Mutex`; cloning the
/// handle shares the same cache. Every operation, reads included, takes
/// the lock exclusively because a hit reorders the recency list.
///
/// Values are stored as `Arc<V>`, so [`get`](Self::get) hands back a
/// cheaply cloned handle instead of requiring `V: Clone`.
#[derive(Clone)]
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LruCore<K, V>>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    /// Creates a new thread-safe LRU cache with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries; use
    /// [`try_new`](Self::try_new) to reject that at construction.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        LruCache {
            inner: Arc::new(Mutex::new(LruCore::new(capacity))),
        }
    }

    /// Creates a new thread-safe LRU cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(LruCache {
            inner: Arc::new(Mutex::new(LruCore::try_new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous value if the key existed. Updating an existing
    /// key repositions it to most-recent and never evicts; inserting a new
    /// key past capacity evicts the least recently used entry.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert!(cache.put(1, "first".to_string()).is_none());
    /// assert_eq!(cache.put(1, "updated".to_string()).as_deref(), Some(&"first".to_string()));
    /// ```
    pub fn put(&self, key: K, value: V) -> Option<Arc<V>> {
        self.put_arc(key, Arc::new(value))
    }

    /// Inserts an `Arc<V>` directly (no re-wrapping if already shared).
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Gets a value by key, marking it most recently used.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// cache.put(1, "value".to_string());
    ///
    /// assert_eq!(cache.get(&1).as_deref(), Some(&"value".to_string()));
    /// assert!(cache.get(&999).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Looks up a value without updating recency order.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key)
    }

    /// Removes an entry and returns its value.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Marks an entry as recently used without retrieving its value.
    ///
    /// Returns `true` if the key was found.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lru()
    }

    /// Peeks at the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.lock();
        core.peek_lru().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Returns `true` if the key exists, without updating recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

impl<K, V> ConcurrentCache for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
