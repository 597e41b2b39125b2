//! The pool: one large mapping, its bump cursor, and the free-list table
//! that sits in front of it. This is the component callers actually touch;
//! `size_class`, `free_list`, `chunk`, and `platform` all exist to serve it.
//!
//! Grounded in `examples/original_source/alloc.c`'s `KV_alloc_pool_init` /
//! `KV_malloc` / `KV_free` / `KV_alloc_pool_free`, with the single global
//! lock replaced by the per-class locks of [`crate::free_list`] and the
//! single-threaded cursor given an atomic sibling for the concurrent case.

use core::cell::Cell;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use alloc::boxed::Box;

use crate::chunk::Chunk;
use crate::config::{MAX_POOLS, MIN_POOL_BYTES};
use crate::error::PoolError;
use crate::free_list::FreeListTable;
use crate::platform;
use crate::size_class::{self, MAX_SMALL_CHUNK_BYTES};
use crate::stats::{Snapshot, Stats};

/// Process-wide count of live pools, enforcing `MAX_POOLS`.
static ACTIVE_POOLS: AtomicUsize = AtomicUsize::new(0);

fn try_reserve_pool_slot() -> Result<(), PoolError> {
    let mut current = ACTIVE_POOLS.load(Ordering::Relaxed);
    loop {
        if current >= MAX_POOLS {
            return Err(PoolError::PoolLimitReached { max: MAX_POOLS });
        }
        match ACTIVE_POOLS.compare_exchange_weak(
            current,
            current + 1,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return Ok(()),
            Err(observed) => current = observed,
        }
    }
}

fn release_pool_slot() {
    ACTIVE_POOLS.fetch_sub(1, Ordering::AcqRel);
}

/// The bump cursor. `Plain` trades atomicity for speed in the
/// single-threaded case; `Atomic` is the only variant a concurrent pool
/// may use. Neither variant ever decreases except for the transient
/// rollback after a failed bounds check under `Atomic`.
enum Cursor {
    Plain(Cell<usize>),
    Atomic(AtomicUsize),
}

impl Cursor {
    fn new(concurrent: bool) -> Self {
        if concurrent {
            Cursor::Atomic(AtomicUsize::new(0))
        } else {
            Cursor::Plain(Cell::new(0))
        }
    }

    fn get(&self) -> usize {
        match self {
            Cursor::Plain(c) => c.get(),
            Cursor::Atomic(a) => a.load(Ordering::Relaxed),
        }
    }

    /// Advance by `total` bytes if doing so would not exceed `capacity`.
    /// Returns the pre-advance cursor value (the offset the caller should
    /// carve its chunk from), or `None` if the pool is exhausted.
    fn bump(&self, total: usize, capacity: usize) -> Option<usize> {
        match self {
            Cursor::Plain(c) => {
                let old = c.get();
                let new = old.saturating_add(total);
                if new > capacity {
                    return None;
                }
                c.set(new);
                Some(old)
            }
            Cursor::Atomic(a) => loop {
                let old = a.load(Ordering::Relaxed);
                let new = old.saturating_add(total);
                match a.compare_exchange_weak(old, new, Ordering::AcqRel, Ordering::Relaxed) {
                    Ok(_) => {
                        // Defensive re-check: a raced advance could have pushed
                        // `new` past capacity even though each winner's own
                        // delta was individually bounded. Roll back and fail.
                        if new > capacity {
                            a.fetch_sub(total, Ordering::AcqRel);
                            return None;
                        }
                        return Some(old);
                    }
                    Err(_) => continue,
                }
            },
        }
    }
}

/// A single large mapping, its bump cursor, and its free-list table.
///
/// Safety contract: every method that takes a `user_ptr` trusts it was
/// returned by an earlier `alloc` call against *this* pool and has not
/// already been passed to `free`. Violating that is undefined behavior,
/// per the error-handling design — this is the same trust boundary
/// `examples/original_source/alloc.c`'s `KV_free` assumes.
pub struct Pool {
    base: NonNull<u8>,
    capacity: usize,
    cursor: Cursor,
    free_lists: FreeListTable,
    concurrent: bool,
    stats: Option<Stats>,
}

// SAFETY: sharing a `Pool` across threads is only sound when `concurrent`
// was set at construction; single-threaded pools rely on the caller's
// promise never to touch them from more than one thread; see module docs.
unsafe impl Sync for Pool {}
unsafe impl Send for Pool {}

impl Pool {
    /// Create a pool with room for at least `requested_capacity` bytes,
    /// rounded up to a multiple of `MIN_POOL_BYTES`. Equivalent to
    /// `init_with_stats(requested_capacity, concurrent, true)`.
    pub fn init(requested_capacity: usize, concurrent: bool) -> Result<Box<Pool>, PoolError> {
        Self::init_with_stats(requested_capacity, concurrent, true)
    }

    /// As [`Pool::init`], but lets the caller opt out of the statistics
    /// record entirely (advisory only; no behavioral difference either way).
    pub fn init_with_stats(
        requested_capacity: usize,
        concurrent: bool,
        with_stats: bool,
    ) -> Result<Box<Pool>, PoolError> {
        try_reserve_pool_slot()?;

        let capacity = round_up(requested_capacity.max(1), MIN_POOL_BYTES);
        let base = match unsafe { platform::map(capacity) } {
            Some(base) => base,
            None => {
                release_pool_slot();
                return Err(PoolError::MappingFailed {
                    requested_bytes: capacity,
                });
            }
        };

        Ok(Box::new(Pool {
            base,
            capacity,
            cursor: Cursor::new(concurrent),
            free_lists: FreeListTable::new(),
            concurrent,
            stats: with_stats.then(Stats::new),
        }))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    #[inline]
    pub fn stats(&self) -> Option<Snapshot> {
        self.stats.as_ref().map(Stats::snapshot)
    }

    /// `true` if `ptr` lies inside this pool's bump region (i.e. it is not
    /// a large, directly-mapped chunk).
    #[inline]
    fn owns_bump_region(&self, ptr: *mut u8) -> bool {
        let start = self.base.as_ptr() as usize;
        let end = start + self.capacity;
        let addr = ptr as usize;
        addr >= start && addr < end
    }

    /// Carve `requested_bytes` of usable payload out of this pool.
    pub fn alloc(&self, requested_bytes: usize) -> Result<NonNull<u8>, PoolError> {
        let total = size_class::total_chunk_size(requested_bytes);

        if total >= MAX_SMALL_CHUNK_BYTES {
            return self.alloc_large(total);
        }

        let class = size_class::class_of(total).expect("small total must map to a class");

        if let Some(chunk) = unsafe { self.free_lists.pop(class) } {
            if let Some(stats) = &self.stats {
                stats.record_free_list_hit(total as u64);
            }
            return Ok(chunk.payload_ptr());
        }

        let offset = self
            .cursor
            .bump(total, self.capacity)
            .ok_or(PoolError::Exhausted {
                requested_total: total,
                capacity: self.capacity,
            })?;

        let chunk = unsafe {
            let ptr = NonNull::new_unchecked(self.base.as_ptr().add(offset));
            let chunk = Chunk::new(ptr);
            chunk.set_size(total);
            chunk
        };

        if let Some(stats) = &self.stats {
            stats.record_bump_alloc(total as u64);
        }

        Ok(chunk.payload_ptr())
    }

    fn alloc_large(&self, total: usize) -> Result<NonNull<u8>, PoolError> {
        let base = unsafe { platform::map(total) }.ok_or(PoolError::MappingFailed {
            requested_bytes: total,
        })?;
        let chunk = Chunk::new(base);
        unsafe { chunk.set_size(total) };

        if let Some(stats) = &self.stats {
            stats.record_large_alloc(total as u64);
        }

        Ok(chunk.payload_ptr())
    }

    /// Release a pointer previously returned by [`Pool::alloc`] against
    /// this same pool.
    ///
    /// # Safety
    /// `user_ptr` must have come from this pool's `alloc` and must not
    /// already have been freed.
    pub unsafe fn free(&self, user_ptr: NonNull<u8>) {
        let chunk = unsafe { Chunk::from_user_ptr(user_ptr) };
        let total = unsafe { chunk.size() };

        if total >= MAX_SMALL_CHUNK_BYTES || !self.owns_bump_region(chunk.as_ptr()) {
            unsafe { platform::unmap(chunk.as_non_null(), total) };
            if let Some(stats) = &self.stats {
                stats.record_large_free(total as u64);
            }
            return;
        }

        let class = size_class::class_of(total).expect("small total must map to a class");
        unsafe { self.free_lists.push(chunk, class) };
        if let Some(stats) = &self.stats {
            stats.record_small_free(total as u64);
        }
    }

    /// Diagnostic: the raw pointer to `class`'s free-list head, or `None`.
    pub fn freelist_head(&self, class: u8) -> Option<NonNull<u8>> {
        self.free_lists.head(class).map(Chunk::as_non_null)
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        unsafe { platform::unmap(self.base, self.capacity) };
        release_pool_slot();
    }
}

/// Destroy a pool, releasing its mapping. Equivalent to dropping the
/// `Box<Pool>` directly; spelled out as its own function so callers have
/// a named counterpart to `Pool::init`.
pub fn pool_free(pool: Box<Pool>) {
    drop(pool);
}

#[inline]
const fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}
