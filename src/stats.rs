//! Optional per-pool allocation statistics.
//!
//! All counters use `Relaxed` ordering — they are observational only and
//! not used as synchronization primitives; the pool's own spinlocks and
//! cursor ordering provide the correctness guarantees. A pool carries
//! these only when asked to at construction, and nothing on the alloc/free
//! hot path branches on whether they are present.

use core::sync::atomic::{AtomicU64, Ordering};

pub(crate) struct Stats {
    /// Free-list `pop` calls that found a chunk.
    pub fr_hits: AtomicU64,
    /// Free-list `pop` calls that found nothing (fell through to bump).
    pub fr_misses: AtomicU64,
    /// Bytes currently sitting on free-lists, reclaimable without a map call.
    pub free_list_bytes: AtomicU64,
    /// Bytes currently in use by small (free-list/bump path) allocations.
    pub small_in_use_bytes: AtomicU64,
    /// Bytes currently in use by large (direct-mapped) allocations.
    pub large_in_use_bytes: AtomicU64,
    /// Cumulative count of small allocations served.
    pub num_small_allocs: AtomicU64,
    /// Cumulative count of large allocations served.
    pub num_large_allocs: AtomicU64,
}

impl Stats {
    pub(crate) const fn new() -> Self {
        Self {
            fr_hits: AtomicU64::new(0),
            fr_misses: AtomicU64::new(0),
            free_list_bytes: AtomicU64::new(0),
            small_in_use_bytes: AtomicU64::new(0),
            large_in_use_bytes: AtomicU64::new(0),
            num_small_allocs: AtomicU64::new(0),
            num_large_allocs: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_free_list_hit(&self, chunk_bytes: u64) {
        self.fr_hits.fetch_add(1, Ordering::Relaxed);
        self.free_list_bytes.fetch_sub(chunk_bytes, Ordering::Relaxed);
        self.small_in_use_bytes.fetch_add(chunk_bytes, Ordering::Relaxed);
        self.num_small_allocs.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_bump_alloc(&self, chunk_bytes: u64) {
        self.fr_misses.fetch_add(1, Ordering::Relaxed);
        self.small_in_use_bytes.fetch_add(chunk_bytes, Ordering::Relaxed);
        self.num_small_allocs.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_large_alloc(&self, chunk_bytes: u64) {
        self.large_in_use_bytes.fetch_add(chunk_bytes, Ordering::Relaxed);
        self.num_large_allocs.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_small_free(&self, chunk_bytes: u64) {
        self.small_in_use_bytes.fetch_sub(chunk_bytes, Ordering::Relaxed);
        self.free_list_bytes.fetch_add(chunk_bytes, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_large_free(&self, chunk_bytes: u64) {
        self.large_in_use_bytes.fetch_sub(chunk_bytes, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            fr_hits: self.fr_hits.load(Ordering::Relaxed),
            fr_misses: self.fr_misses.load(Ordering::Relaxed),
            free_list_bytes: self.free_list_bytes.load(Ordering::Relaxed),
            small_in_use_bytes: self.small_in_use_bytes.load(Ordering::Relaxed),
            large_in_use_bytes: self.large_in_use_bytes.load(Ordering::Relaxed),
            num_small_allocs: self.num_small_allocs.load(Ordering::Relaxed),
            num_large_allocs: self.num_large_allocs.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time, non-atomic copy of one pool's counters. Individual
/// fields are each loaded atomically, but the snapshot as a whole is not
/// globally consistent under concurrent mutation — sufficient for
/// monitoring, not for correctness decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub fr_hits: u64,
    pub fr_misses: u64,
    pub free_list_bytes: u64,
    pub small_in_use_bytes: u64,
    pub large_in_use_bytes: u64,
    pub num_small_allocs: u64,
    pub num_large_allocs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_are_zero() {
        let stats = Stats::new();
        assert_eq!(stats.snapshot(), Snapshot::default());
    }

    #[test]
    fn hit_and_free_balance_to_zero_in_use() {
        let stats = Stats::new();
        stats.record_free_list_hit(24);
        let mid = stats.snapshot();
        assert_eq!(mid.fr_hits, 1);
        assert_eq!(mid.small_in_use_bytes, 24);

        stats.record_small_free(24);
        let end = stats.snapshot();
        assert_eq!(end.small_in_use_bytes, 0);
        assert_eq!(end.free_list_bytes, 24);
    }

    #[test]
    fn large_alloc_and_free_balance() {
        let stats = Stats::new();
        stats.record_large_alloc(4104);
        assert_eq!(stats.snapshot().large_in_use_bytes, 4104);
        stats.record_large_free(4104);
        assert_eq!(stats.snapshot().large_in_use_bytes, 0);
        assert_eq!(stats.snapshot().num_large_allocs, 1);
    }

    #[test]
    fn bump_path_counts_as_a_miss() {
        let stats = Stats::new();
        stats.record_bump_alloc(40);
        let snap = stats.snapshot();
        assert_eq!(snap.fr_misses, 1);
        assert_eq!(snap.fr_hits, 0);
        assert_eq!(snap.num_small_allocs, 1);
    }
}
