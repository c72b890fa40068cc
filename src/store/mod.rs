//! Backing-store seam for the write-through cache.
//!
//! The write-through cache mirrors every write into a backing store and
//! clears it in lockstep on expiry; it never reads the store back. The
//! seam is therefore write-shaped: [`BackingStore`] carries exactly the
//! operations the cache drives, and anything an embedding application
//! wants beyond that (reads, persistence, fan-out) lives on its concrete
//! store type, outside the cache's contract.
//!
//! [`MemoryStore`] is the default: a plain in-process map, useful on its
//! own and as the model for richer stores.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Write-side operations the write-through cache drives on its store.
///
/// Implementations are mutated only under the cache's write lock, so they
/// need no internal synchronization of their own.
pub trait BackingStore<K, V> {
    /// Records a write. Overwrites any previous value for the key.
    fn write(&mut self, key: K, value: Arc<V>);

    /// Drops every record, in lockstep with a cache epoch reset.
    fn clear(&mut self);

    /// Current number of records.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory backing store: a plain map kept in lockstep with the cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use kvcache::store::{BackingStore, MemoryStore};
///
/// let mut store: MemoryStore<String, i32> = MemoryStore::new();
/// store.write("a".into(), Arc::new(1));
/// assert_eq!(store.get(&"a".into()).as_deref(), Some(&1));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore<K, V> {
    map: FxHashMap<K, Arc<V>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Fetches a record by key.
    ///
    /// This is the store's own surface for embedding applications; the
    /// write-through cache never calls it.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.map.get(key).map(Arc::clone)
    }

    /// Returns `true` if the store holds a record for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}

impl<K, V> BackingStore<K, V> for MemoryStore<K, V>
where
    K: Eq + Hash,
{
    fn write(&mut self, key: K, value: Arc<V>) {
        self.map.insert(key, value);
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
