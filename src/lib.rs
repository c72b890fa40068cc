//! kvcache: a small family of in-process, thread-safe key/value caches.
//!
//! Four sibling caches share a two/three-method surface (`put`/`set` and
//! `get`) and differ only in their eviction or freshness policy:
//!
//! - [`policy::lru::LruCache`]: least-recently-used eviction
//! - [`policy::fifo::FifoCache`]: insertion-ordered eviction, where
//!   updating a key repositions it
//! - [`policy::lfu::LfuCache`]: access-counting cache whose eviction is
//!   recency-driven (see its module docs for the exact rule)
//! - [`policy::write_through::WriteThroughCache`]: unbounded cache that
//!   mirrors writes into a backing store and clears wholesale on a TTL
//!   tick
//!
//! A missing key is never an error: reads return `Option`.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod store;
pub mod traits;
