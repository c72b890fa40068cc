//! Frequency-tracking (LFU-style) cache with recency-based eviction.
//!
//! Every entry carries an access counter, starting at 1 and incremented on
//! every hit or update. Eviction, however, does **not** consult the
//! counter: the victim is always the entry at the cold end of an
//! access-ordered list, the least recently touched entry, exactly as in
//! the LRU policy. The counter is bookkeeping, observable through
//! [`frequency`](crate::traits::LfuCacheTrait::frequency).
//!
//! Callers depending on the established eviction sequence rely on this
//! hybrid rule; a counter-driven victim selection would change which keys
//! survive and is deliberately not what this type implements. Use this
//! variant when you need its exact behavior, not as a textbook LFU.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           LfuCore<K, V>                              │
//! │                                                                      │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  index: FxHashMap<K, SlotId>                               │    │
//! │   └───────────────┬────────────┬────────────┬──────────────────┘    │
//! │                   ▼            ▼            ▼                       │
//! │   ┌────────────────────────────────────────────────────────────┐    │
//! │   │  order: OrderList<Entry { key, value, count }>             │    │
//! │   │                                                            │    │
//! │   │  head ──► [hot] ◄──► [ .. ] ◄──► [cold] ◄── tail           │    │
//! │   │                                   ▲                        │    │
//! │   │                                   └── eviction victim      │    │
//! │   └────────────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   set(existing): move to head, replace value, count += 1
//!   set(new):      if len >= capacity, unlink tail first;
//!                  then push at head with count = 1
//!   get(hit):      move to head, count += 1, return value
//!   get(miss):     None. No side effects.
//! ```
//!
//! Note the eviction timing: unlike the LRU and FIFO policies, which link
//! the new entry in and then trim, this policy evicts *before* inserting.
//! Externally both orders keep `len <= capacity` on return.
//!
//! ## Key Components
//!
//! | Component        | Description                                      |
//! |------------------|--------------------------------------------------|
//! | `LfuCore<K, V>`  | Single-threaded core: index + access order       |
//! | `LfuCache<K, V>` | Thread-safe wrapper, `parking_lot::Mutex`        |
//!
//! ## Example Usage
//!
//! ```
//! use kvcache::policy::lfu::LfuCache;
//!
//! let cache: LfuCache<&str, &str> = LfuCache::new(2);
//! cache.set("foo", "bar");
//! cache.set("baz", "qux");
//!
//! // Touching "foo" leaves "baz" at the cold end...
//! cache.get(&"foo");
//! cache.set("quux", "quuz"); // ...so "baz" is evicted
//! assert!(cache.get(&"baz").is_none());
//!
//! // "foo" has the higher count, but recency rules: it is now coldest
//! cache.set("corge", "grault");
//! assert!(cache.get(&"foo").is_none());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::{OrderList, SlotId};
use crate::error::ConfigError;
use crate::traits::{ConcurrentCache, CoreCache, LfuCacheTrait, MutableCache};

struct Entry<K, V> {
    key: K,
    value: Arc<V>,
    count: u64,
}

/// Single-threaded LFU-style cache core.
///
/// Thread safety is provided by the [`LfuCache`] wrapper.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use kvcache::policy::lfu::LfuCore;
/// use kvcache::traits::{CoreCache, LfuCacheTrait};
///
/// let mut cache = LfuCore::new(10);
/// cache.insert("a", Arc::new(1));
/// cache.get(&"a");
/// cache.get(&"a");
/// assert_eq!(cache.frequency(&"a"), Some(3));
/// ```
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    order: OrderList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new cache core with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries; use
    /// [`try_new`](Self::try_new) to reject that at construction instead.
    pub fn new(capacity: usize) -> Self {
        LfuCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: OrderList::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a new cache core, rejecting a zero capacity.
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
            assert!(entry.count >= 1, "entry count below 1");
        }
    }
}

impl<K, V> CoreCache<K, Arc<V>> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        if let Some(&id) = self.index.get(&key) {
            self.order.move_to_front(id);
            let previous = self.order.get_mut(id).map(|entry| {
                entry.count += 1;
                std::mem::replace(&mut entry.value, value)
            });

            #[cfg(debug_assertions)]
            self.debug_validate_invariants();

            return previous;
        }

        if self.capacity == 0 {
            return None;
        }

        // Make room before linking the new entry in.
        if self.index.len() >= self.capacity {
            self.evict_tail();
        }

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
            count: 1,
        });
        self.index.insert(key, id);

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        None
    }

    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        let &id = self.index.get(key)?;
        self.order.move_to_front(id);
        let entry = self.order.get_mut(id)?;
        entry.count += 1;
        Some(&entry.value)
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

impl<K, V> MutableCache<K, Arc<V>> for LfuCore<K, V>
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

impl<K, V> LfuCacheTrait<K, Arc<V>> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn frequency(&self, key: &K) -> Option<u64> {
        let &id = self.index.get(key)?;
        self.order.get(id).map(|entry| entry.count)
    }

    fn pop_victim(&mut self) -> Option<(K, Arc<V>)> {
        let popped = self.evict_tail();

        #[cfg(debug_assertions)]
        self.debug_validate_invariants();

        popped
    }

    fn peek_victim(&self) -> Option<(&K, &Arc<V>)> {
        let id = self.order.back_id()?;
        self.order.get(id).map(|entry| (&entry.key, &entry.value))
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

/// Thread-safe LFU-style cache.
///
/// Shares one [`LfuCore`] behind a `parking_lot::Mutex`; cloning the
/// handle shares the same cache. Reads take the lock exclusively because
/// a hit mutates both the access order and the entry counter.
///
/// The write operation is named [`set`](Self::set), matching the
/// variant's established surface; it behaves like `put` on the sibling
/// caches.
#[derive(Clone)]
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LfuCore<K, V>>>,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    /// Creates a new thread-safe cache with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no entries; use
    /// [`try_new`](Self::try_new) to reject that at construction.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::lfu::LfuCache;
    ///
    /// let cache: LfuCache<String, i32> = LfuCache::new(128);
    /// assert_eq!(cache.capacity(), 128);
    /// ```
    pub fn new(capacity: usize) -> Self {
        LfuCache {
            inner: Arc::new(Mutex::new(LfuCore::new(capacity))),
        }
    }

    /// Creates a new thread-safe cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(LfuCache {
            inner: Arc::new(Mutex::new(LfuCore::try_new(capacity)?)),
        })
    }

    /// Sets the value for a key, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous value if the key existed. On an existing key
    /// this counts as a touch: the entry moves to the hot end and its
    /// counter increments. On a new key past capacity, the entry at the
    /// cold end is evicted first.
    pub fn set(&self, key: K, value: V) -> Option<Arc<V>> {
        self.set_arc(key, Arc::new(value))
    }

    /// Sets an `Arc<V>` directly (no re-wrapping if already shared).
    pub fn set_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Gets a value by key, counting the access and marking the entry hot.
    ///
    /// # Example
    ///
    /// ```
    /// use kvcache::policy::lfu::LfuCache;
    ///
    /// let cache: LfuCache<&str, i32> = LfuCache::new(4);
    /// cache.set("a", 1);
    ///
    /// assert_eq!(cache.get(&"a").map(|v| *v), Some(1));
    /// assert_eq!(cache.frequency(&"a"), Some(2));
    /// ```
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Returns the access count recorded for a key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Removes an entry and returns its value.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Removes and returns the current eviction victim.
    pub fn pop_victim(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_victim()
    }

    /// Returns `true` if the key exists, without counting an access.
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

impl<K, V> ConcurrentCache for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LfuCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
