//! Per-class segregated free-list table: `NUM_CLASSES` independent LIFO
//! doubly-linked lists, each guarded by its own lock so that unrelated
//! classes never contend. Grounded in `examples/original_source/alloc.c`'s
//! `KV_add_to_freelist`/`KV_remove_from_freelist_head`, translated from a
//! single global lock to a one-lock-per-class design.

use crate::chunk::Chunk;
use crate::size_class::NUM_CLASSES;
use crate::sync::SpinMutex;

/// One class entry: a LIFO head pointer under its own spinlock.
struct ClassList {
    head: SpinMutex<Option<Chunk>>,
}

impl ClassList {
    const fn new() -> Self {
        Self {
            head: SpinMutex::new(None),
        }
    }
}

/// The full table of per-class free-lists for one pool.
pub struct FreeListTable {
    classes: [ClassList; NUM_CLASSES],
}

impl FreeListTable {
    pub const fn new() -> Self {
        const EMPTY: ClassList = ClassList::new();
        Self {
            classes: [EMPTY; NUM_CLASSES],
        }
    }

    /// Pop the head of `class`'s list, or `None` on a miss.
    ///
    /// # Safety
    /// Every chunk reachable from this table must be a well-formed
    /// free-list node (see module docs on [`crate::chunk`]).
    pub unsafe fn pop(&self, class: u8) -> Option<Chunk> {
        let mut head = self.classes[class as usize].head.lock();
        let popped = (*head)?;
        let new_head = unsafe { popped.next() };
        if let Some(new_head) = new_head {
            unsafe { new_head.set_prev(None) };
        }
        *head = new_head;
        Some(popped)
    }

    /// Push `chunk` onto `class`'s list as the new head.
    ///
    /// # Safety
    /// `chunk` must be at least `MIN_CLASS_BYTES` long, must not already
    /// be present on any free-list, and must belong to `class`.
    pub unsafe fn push(&self, chunk: Chunk, class: u8) {
        let mut head = self.classes[class as usize].head.lock();
        unsafe {
            chunk.set_prev(None);
            chunk.set_next(*head);
            if let Some(old_head) = *head {
                old_head.set_prev(Some(chunk));
            }
        }
        *head = Some(chunk);
    }

    /// Diagnostic accessor: the raw head pointer for `class`, or null.
    pub fn head(&self, class: u8) -> Option<Chunk> {
        *self.classes[class as usize].head.lock()
    }
}

impl Default for FreeListTable {
    fn default() -> Self {
        Self::new()
    }
}
