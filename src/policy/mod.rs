//! Cache policy implementations.
//!
//! Four sibling caches share one shape (a bounded key index plus an
//! auxiliary structure that decides what to evict) and differ only in
//! what that structure tracks and when it is updated:
//!
//! | Module          | Policy                                            |
//! |-----------------|---------------------------------------------------|
//! | [`lru`]         | Evict the least recently touched entry            |
//! | [`fifo`]        | Evict the oldest insert-or-update                 |
//! | [`lfu`]         | Track access counts; evict by recency (see docs)  |
//! | [`write_through`] | No eviction; whole-cache TTL reset + mirrored writes |

pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod write_through;
