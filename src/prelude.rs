pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{OrderList, SlotArena, SlotId};
pub use crate::error::ConfigError;
pub use crate::policy::fifo::{FifoCache, FifoCore};
pub use crate::policy::lfu::{LfuCache, LfuCore};
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::policy::write_through::WriteThroughCache;
pub use crate::store::{BackingStore, MemoryStore};
pub use crate::traits::{
    ConcurrentCache, CoreCache, FifoCacheTrait, LfuCacheTrait, LruCacheTrait, MutableCache,
};
