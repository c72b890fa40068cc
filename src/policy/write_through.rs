//! Write-through cache with whole-cache TTL expiry.
//!
//! Every `put` lands in two places before it returns: a fast in-memory
//! index and a backing store (see [`crate::store`]). Reads come only from
//! the fast index. Freshness is a property of the *whole* cache: a
//! background sweeper wakes once per TTL period and clears every entry
//! from both the index and the store. This is an epoch reset, not
//! per-entry expiry. A key written moments before the tick is evicted with the
//! rest; one written moments after survives until the next tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                     WriteThroughCache<K, V, S>                       │
//! │                                                                      │
//! │   ┌──────────────────────── RwLock ─────────────────────────────┐   │
//! │   │                                                             │   │
//! │   │   cache: FxHashMap<K, Arc<V>>     store: S (BackingStore)   │   │
//! │   │        ▲            ▲                  ▲           ▲        │   │
//! │   └────────┼────────────┼──────────────────┼───────────┼────────┘   │
//! │            │            │                  │           │            │
//! │       get (read)   put (write) ────────────┘      sweep (write)     │
//! │                         │                              │            │
//! │                         └── both maps, one lock hold ──┘            │
//! │                                                                      │
//! │   sweeper thread: wakes every ttl, clears cache + store together    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! `get` takes the read lock, so reads run concurrently with each other.
//! `put`, the sweep, and [`clear`](WriteThroughCache::clear) take the
//! write lock and exclude everything: a reader never observes a
//! partially-cleared state, and a `put` racing a tick lands wholly before
//! or wholly after the clear; both are legal outcomes.
//!
//! There is no capacity bound; the cache grows freely between ticks.
//!
//! ## Shutdown
//!
//! The cache owns its sweeper thread. Dropping the cache (or calling
//! [`stop`](WriteThroughCache::stop) explicitly) signals the sweeper and
//! joins it; after that nothing expires, while `put`/`get` keep working.
//! Without an owner-driven stop the thread would outlive every handle to
//! the cache and run for the rest of the process.
//!
//! ## Example Usage
//!
//! ```
//! use std::thread;
//! use std::time::Duration;
//!
//! use kvcache::policy::write_through::WriteThroughCache;
//!
//! let cache: WriteThroughCache<String, String> =
//!     WriteThroughCache::new(Duration::from_millis(200));
//!
//! cache.put("item1".into(), "value1".into());
//! assert!(cache.get(&"item1".into()).is_some());
//!
//! // After the tick the whole cache is gone
//! thread::sleep(Duration::from_millis(600));
//! assert!(cache.get(&"item1".into()).is_none());
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::store::{BackingStore, MemoryStore};

struct TtlState<K, V, S> {
    cache: FxHashMap<K, Arc<V>>,
    store: S,
}

/// Write-through cache with periodic whole-cache expiry.
///
/// Generic over the backing store `S`; defaults to
/// [`MemoryStore`](crate::store::MemoryStore). Share across threads by
/// wrapping in `Arc`; `put` and `get` take `&self`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use kvcache::policy::write_through::WriteThroughCache;
///
/// let cache: WriteThroughCache<String, i32> = WriteThroughCache::new(Duration::from_secs(60));
/// cache.put("hits".into(), 1);
/// assert_eq!(cache.get(&"hits".into()).as_deref(), Some(&1));
/// assert!(cache.get(&"misses".into()).is_none());
/// ```
pub struct WriteThroughCache<K, V, S = MemoryStore<K, V>> {
    state: Arc<RwLock<TtlState<K, V, S>>>,
    ttl: Duration,
    stop_tx: Option<mpsc::Sender<()>>,
    sweeper: Option<thread::JoinHandle<()>>,
}

impl<K, V> WriteThroughCache<K, V, MemoryStore<K, V>>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Creates a cache with an in-memory backing store and starts its
    /// sweeper with period `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` is zero (the sweeper would spin). Use
    /// [`try_new`](Self::try_new) to handle that without panicking.
    pub fn new(ttl: Duration) -> Self {
        match Self::try_new(ttl) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid write-through cache config: {err}"),
        }
    }

    /// Creates a cache with an in-memory backing store, rejecting a zero
    /// `ttl`.
    pub fn try_new(ttl: Duration) -> Result<Self, ConfigError> {
        Self::try_with_store(ttl, MemoryStore::new())
    }
}

impl<K, V, S> WriteThroughCache<K, V, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: BackingStore<K, V> + Send + Sync + 'static,
{
    /// Creates a cache over a caller-supplied backing store and starts
    /// its sweeper with period `ttl`.
    ///
    /// # Panics
    ///
    /// Panics if `ttl` is zero. Use
    /// [`try_with_store`](Self::try_with_store) to handle that without
    /// panicking.
    pub fn with_store(ttl: Duration, store: S) -> Self {
        match Self::try_with_store(ttl, store) {
            Ok(cache) => cache,
            Err(err) => panic!("invalid write-through cache config: {err}"),
        }
    }

    /// Creates a cache over a caller-supplied backing store, rejecting a
    /// zero `ttl`.
    pub fn try_with_store(ttl: Duration, store: S) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::new("ttl must be non-zero"));
        }

        let state = Arc::new(RwLock::new(TtlState {
            cache: FxHashMap::default(),
            store,
        }));

        let (stop_tx, stop_rx) = mpsc::channel();
        let sweeper_state = Arc::clone(&state);
        let sweeper = thread::spawn(move || sweep_loop(sweeper_state, ttl, stop_rx));

        Ok(WriteThroughCache {
            state,
            ttl,
            stop_tx: Some(stop_tx),
            sweeper: Some(sweeper),
        })
    }

    /// Writes a value to the fast index and the backing store, in one
    /// exclusive critical section.
    ///
    /// Returns the value previously cached for the key, if any. The write
    /// is in both places before this returns; whether it survives the
    /// next tick depends only on which side of the tick it landed.
    pub fn put(&self, key: K, value: V) -> Option<Arc<V>> {
        self.put_arc(key, Arc::new(value))
    }

    /// Writes an `Arc<V>` directly (no re-wrapping if already shared).
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut state = self.state.write();
        state.store.write(key.clone(), Arc::clone(&value));
        state.cache.insert(key, value)
    }

    /// Reads a value from the fast index.
    ///
    /// Never consults the backing store; concurrent `get`s share the read
    /// lock.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.state.read().cache.get(key).map(Arc::clone)
    }

    /// Returns `true` if the fast index currently holds the key.
    pub fn contains(&self, key: &K) -> bool {
        self.state.read().cache.contains_key(key)
    }

    /// Returns the number of entries currently in the fast index.
    pub fn len(&self) -> usize {
        self.state.read().cache.len()
    }

    /// Returns `true` if the fast index is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().cache.is_empty()
    }

    /// Returns the sweep period this cache was constructed with.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clears the fast index and the backing store immediately, without
    /// waiting for the next tick.
    ///
    /// The sweeper's schedule is unaffected.
    pub fn clear(&self) {
        let mut state = self.state.write();
        let dropped = state.cache.len();
        state.cache.clear();
        state.store.clear();
        debug!(entries = dropped, "manual epoch reset");
    }

    /// Stops the background sweeper and waits for it to exit.
    ///
    /// After this returns nothing expires; `put` and `get` keep working
    /// on whatever the last epoch left behind. Dropping the cache calls
    /// this implicitly. Idempotent.
    pub fn stop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.sweeper.take() {
            let _ = handle.join();
        }
    }
}

fn sweep_loop<K, V, S>(
    state: Arc<RwLock<TtlState<K, V, S>>>,
    period: Duration,
    stop_rx: mpsc::Receiver<()>,
) where
    S: BackingStore<K, V>,
{
    loop {
        match stop_rx.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {
                let mut state = state.write();
                let dropped = state.cache.len();
                state.cache.clear();
                state.store.clear();
                drop(state);

                if dropped > 0 {
                    debug!(entries = dropped, "epoch sweep cleared cache and backing store");
                } else {
                    trace!("epoch sweep found cache empty");
                }
            },
            // Stop signal, or every cache handle is gone.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

impl<K, V, S> Drop for WriteThroughCache<K, V, S> {
    fn drop(&mut self) {
        // Same sequence as stop(), without its trait bounds.
        drop(self.stop_tx.take());
        if let Some(handle) = self.sweeper.take() {
            let _ = handle.join();
        }
    }
}

impl<K, V, S> fmt::Debug for WriteThroughCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteThroughCache")
            .field("ttl", &self.ttl)
            .field("running", &self.sweeper.is_some())
            .finish_non_exhaustive()
    }
}
