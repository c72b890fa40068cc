// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Tests that verify library-wide behavioral consistency across all cache
// variants. These span multiple modules and belong here rather than in any
// single source file.

use std::time::Duration;

use kvcache::policy::fifo::FifoCache;
use kvcache::policy::lfu::LfuCache;
use kvcache::policy::lru::LruCache;
use kvcache::policy::write_through::WriteThroughCache;

// ==============================================
// Capacity-0 Behavior
// ==============================================
//
// Every bounded variant must honor capacity=0 the same way: the capacity
// is reported as-is and every insert is rejected, never coerced to 1.

mod zero_capacity {
    use super::*;

    #[test]
    fn lru_honors_and_rejects() {
        let cache: LruCache<&str, i32> = LruCache::new(0);
        assert_eq!(cache.capacity(), 0);
        cache.put("key", 42);
        assert_eq!(cache.len(), 0);
        assert!(cache.get(&"key").is_none());
    }

    #[test]
    fn fifo_honors_and_rejects() {
        let cache: FifoCache<&str, i32> = FifoCache::new(0);
        assert_eq!(cache.capacity(), 0);
        cache.put("key", 42);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn lfu_honors_and_rejects() {
        let cache: LfuCache<&str, i32> = LfuCache::new(0);
        assert_eq!(cache.capacity(), 0);
        cache.set("key", 42);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn try_new_rejects_consistently() {
        assert!(LruCache::<u64, u64>::try_new(0).is_err());
        assert!(FifoCache::<u64, u64>::try_new(0).is_err());
        assert!(LfuCache::<u64, u64>::try_new(0).is_err());
        assert!(WriteThroughCache::<u64, u64>::try_new(Duration::ZERO).is_err());
    }
}

// ==============================================
// Capacity Bound
// ==============================================
//
// For any sequence of writes with distinct keys exceeding capacity, the
// bounded caches hold exactly `capacity` entries afterwards, never more.

mod capacity_bound {
    use super::*;

    const CAPACITY: usize = 8;
    const KEYS: u64 = 100;

    #[test]
    fn lru_holds_exactly_capacity() {
        let cache: LruCache<u64, u64> = LruCache::new(CAPACITY);
        for i in 0..KEYS {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), CAPACITY);
    }

    #[test]
    fn fifo_holds_exactly_capacity() {
        let cache: FifoCache<u64, u64> = FifoCache::new(CAPACITY);
        for i in 0..KEYS {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), CAPACITY);
    }

    #[test]
    fn lfu_holds_exactly_capacity() {
        let cache: LfuCache<u64, u64> = LfuCache::new(CAPACITY);
        for i in 0..KEYS {
            cache.set(i, i);
        }
        assert_eq!(cache.len(), CAPACITY);
    }
}

// ==============================================
// Update-In-Place
// ==============================================
//
// For every variant: writing k twice then reading k yields the second
// value, and the size does not grow.

mod update_in_place {
    use super::*;

    #[test]
    fn lru() {
        let cache: LruCache<&str, i32> = LruCache::new(4);
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(cache.get(&"k").as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fifo() {
        let cache: FifoCache<&str, i32> = FifoCache::new(4);
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(cache.get(&"k").as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lfu() {
        let cache: LfuCache<&str, i32> = LfuCache::new(4);
        cache.set("k", 1);
        cache.set("k", 2);
        assert_eq!(cache.get(&"k").as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn write_through() {
        let cache: WriteThroughCache<String, i32> =
            WriteThroughCache::new(Duration::from_secs(60));
        cache.put("k".into(), 1);
        cache.put("k".into(), 2);
        assert_eq!(cache.get(&"k".into()).as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }
}

// ==============================================
// Miss Semantics
// ==============================================
//
// A key never inserted, or already evicted, reads as None everywhere.

mod miss_semantics {
    use super::*;

    #[test]
    fn never_inserted_reads_none() {
        let lru: LruCache<&str, i32> = LruCache::new(4);
        let fifo: FifoCache<&str, i32> = FifoCache::new(4);
        let lfu: LfuCache<&str, i32> = LfuCache::new(4);
        let ttl: WriteThroughCache<String, i32> =
            WriteThroughCache::new(Duration::from_secs(60));

        assert!(lru.get(&"ghost").is_none());
        assert!(fifo.get(&"ghost").is_none());
        assert!(lfu.get(&"ghost").is_none());
        assert!(ttl.get(&"ghost".to_string()).is_none());
    }

    #[test]
    fn evicted_reads_none() {
        let cache: LruCache<u64, u64> = LruCache::new(1);
        cache.put(1, 10);
        cache.put(2, 20);
        assert!(cache.get(&1).is_none());
        assert_eq!(cache.get(&2).as_deref(), Some(&20));
    }
}

// ==============================================
// Eviction Sequences
// ==============================================
//
// The canonical per-policy sequences: which key each variant gives up
// under the same kind of pressure.

mod eviction_sequences {
    use super::*;

    #[test]
    fn lru_read_protects() {
        let cache: LruCache<&str, i32> = LruCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);
        cache.get(&"b");
        cache.put("d", 4);

        assert!(cache.get(&"a").is_none());
        assert!(cache.get(&"b").is_some());
        assert!(cache.get(&"c").is_some());
    }

    #[test]
    fn fifo_update_protects_but_read_does_not() {
        let cache: FifoCache<&str, i32> = FifoCache::new(3);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        cache.get(&"a"); // no effect on order
        cache.put("a", 10); // repositions "a" to newest
        cache.put("d", 4);

        assert!(cache.get(&"a").is_some());
        assert!(cache.get(&"b").is_none());
    }

    #[test]
    fn lfu_counter_is_tracked_but_recency_decides() {
        let cache: LfuCache<&str, &str> = LfuCache::new(2);
        cache.set("foo", "bar");
        cache.set("baz", "qux");
        cache.get(&"foo");

        cache.set("quux", "quuz");
        assert!(cache.get(&"baz").is_none());

        // "foo" holds the highest count yet is next out the door.
        assert!(cache.frequency(&"foo").unwrap() > cache.frequency(&"quux").unwrap());
        cache.set("corge", "grault");
        assert!(cache.get(&"foo").is_none());
    }
}
