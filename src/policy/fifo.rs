//! First-In-First-Out (FIFO) cache with update-repositioning.
//!
//! Evicts the entry at the old end of an age queue. Lookups never reorder
//! anything, but this variant departs from textbook FIFO in one deliberate
//! way: a `put` on an *existing* key repositions it to the new end while
//! replacing its value, so an updated key is protected from the next
//! eviction even though it was not newly inserted. Callers depending on
//! the established eviction sequence rely on this; do not "correct" it to
//! pure insertion order.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          FifoCore<K, V>                              │
//! │                                                                      │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  index: FxHashMap<K, SlotId>                               │    │
//! │   └───────────────┬────────────┬────────────┬──────────────────┘    │
//! │                   ▼            ▼            ▼                       │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  order: OrderList<Entry { key, value }>                    │    │
//! │   │                                                            │    │
//! │   │  head ──► [newest] ◄──► [ .. ] ◄──► [oldest] ◄── tail      │    │
//! │   └────────────────────────────────────────────────────────────┘    │
//! │                                                                      │
//! │   get: index lookup only, order untouched                            │
//! │   put(existing): move to head + replace value                        │
//! │   put(new): push head; evict tail past capacity                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! | Component         | Description                                     |
//! |-------------------|-------------------------------------------------|
//! | `FifoCore<K, V>`  | Single-threaded core: index + age queue         |
//! | `FifoCache<K, V>` | Thread-safe wrapper, `parking_lot::Mutex`       |
//!
//! ## No Arbitrary Removal
//!
//! `FifoCore` implements [`FifoCacheTrait`], not
//! [`MutableCache`](crate::traits::MutableCache): removing entries from
//! the middle of the age queue would leave the queue claiming an order the
//! cache no longer honors. The only removals are `pop_oldest` and the
//! capacity eviction.
//!
//! ## Example Usage
//!
//! ```
//! use kvcache::policy::fifo::FifoCache;
//!
//! let cache: FifoCache<&str, i32> = FifoCache::new(3);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3);
//!
//! // Updating "a" repositions it to the new end...
//! cache.put("a", 10);
//! // ...so the next eviction takes "b", not "a"
//! cache.put("d", 4);
//! assert!(cache.get(&"a").is_some());
//! assert!(cache.get(&"b").is_none());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{OrderList, SlotId};
use crate::error::ConfigError;
use crate::traits::{ConcurrentCache, CoreCache, FifoCacheTrait};

struct Entry<K, V> {
    key: K,
    value: Arc<V>,
}

/// Single-threaded FIFO cache core.
///
/// Thread safety is provided by the [`FifoCache`] wrapper.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use kvcache::policy::fifo::FifoCore;
/// use kvcache::traits::{CoreCache, FifoCacheTrait};
///
/// let mut cache = FifoCore::new(2);
/// cache.insert("a", Arc::new(1));
/// cache.insert("b", Arc::new(2));
/// assert_eq!(cache.peek_oldest().map(|(k, _)| *k), Some("a"));
/// ```
pub struct FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    order: OrderList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new FIFO cache core with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries; use
    /// [`try_new`](Self::try_new) to reject that at construction instead.
    pub fn new(capacity: usize) -> Self {
        FifoCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderList::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a new FIFO cache core, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be at least 1"));
        }
        Ok(Self::new(capacity))
    }

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

impl<K, V> CoreCache<K, Arc<V>> for FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        if let Some(&id) = self.index.get(&key) {
            // Updates count as "new" for age purposes.
            self.order.move_to_front(id);
            let previous = self
                .order
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));

            #[cfg(debug_assertions)]
            self.debug_validate_invariants();

            return previous;
        }

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

    /// Pure lookup: never reorders the age queue.
    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        let &id = self.index.get(key)?;
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

impl<K, V> FifoCacheTrait<K, Arc<V>> for FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_oldest(&mut self) -> Option<(K, Arc<V>)> {
        let popped = self.evict_tail();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        popped
    }

    fn peek_oldest(&self) -> Option<(&K, &Arc<V>)> {
        let id = self.order.back_id()?;
        self.order.get(id).map(|entry| (&entry.key, &entry.value))
    }

    fn age_rank(&self, key: &K) -> Option<usize> {
        let &target = self.index.get(key)?;
        // The list runs newest → oldest; age rank counts from the old end.
        self.order
            .iter_ids()
            .position(|id| id == target)
            .map(|pos| self.order.len() - 1 - pos)
    }
}

impl<K, V> fmt::Debug for FifoCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a FIFO cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

/// Thread-safe FIFO cache.
///
/// Shares one [`FifoCore`] behind a `parking_lot::Mutex`; cloning the
/// handle shares the same cache. Reads take the lock exclusively too:
/// the critical section is a bounded O(1) map/list sequence, and a single
/// lock keeps `get` linearized with concurrent `put`s.
#[derive(Clone)]
pub struct FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<FifoCore<K, V>>>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    /// Creates a new thread-safe FIFO cache with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries; use
    /// [`try_new`](Self::try_new) to reject that at construction.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::fifo::FifoCache;
    ///
    /// let cache: FifoCache<u32, String> = FifoCache::new(64);
    /// assert_eq!(cache.capacity(), 64);
    /// ```
    pub fn new(capacity: usize) -> Self {
        FifoCache {
            inner: Arc::new(Mutex::new(FifoCore::new(capacity))),
        }
    }

    /// Creates a new thread-safe FIFO cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(FifoCache {
            inner: Arc::new(Mutex::new(FifoCore::try_new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous value if the key existed. Updating an existing
    /// key replaces its value *and* repositions it to the new end of the
    /// age queue.
    pub fn put(&self, key: K, value: V) -> Option<Arc<V>> {
        self.put_arc(key, Arc::new(value))
    }

    /// Inserts an `Arc<V>` directly (no re-wrapping if already shared).
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Gets a value by key. Never affects eviction order.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::fifo::FifoCache;
    ///
    /// let cache: FifoCache<u32, String> = FifoCache::new(2);
    /// cache.put(1, "one".to_string());
    ///
    /// assert_eq!(cache.get(&1).as_deref(), Some(&"one".to_string()));
    /// assert!(cache.get(&9).is_none());
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Removes and returns the oldest entry.
    pub fn pop_oldest(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_oldest()
    }

    /// Peeks at the oldest entry without removing it.
    pub fn peek_oldest(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.lock();
        core.peek_oldest().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Returns `true` if the key exists.
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

impl<K, V> ConcurrentCache for FifoCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for FifoCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("FifoCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
