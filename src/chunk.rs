//! Raw accessors for the in-band chunk layout, mirroring the pointer
//! arithmetic in `examples/original_source/alloc.c`'s `KV_malloc`/`KV_free`.
//!
//! A chunk is a byte range `[base, base + size)`. The first 8 bytes are
//! always the size header. While the chunk is in use, everything from
//! offset 8 onward is user payload. While it sits on a free-list, offsets
//! +8 and +16 are repurposed as the `prev`/`next` links of that class's
//! doubly-linked list; this is safe because `MIN_CLASS_BYTES == 16` plus
//! the header guarantees at least 24 bytes, the minimum a prev/next pair
//! needs.

use core::ptr::NonNull;

use crate::size_class::HEADER_BYTES;

const PREV_OFFSET: usize = 8;
const NEXT_OFFSET: usize = 16;

/// A pointer to the start of a chunk (its size header), not the user
/// payload. All methods are `unsafe` because they trust the caller to
/// have exclusive access and a chunk large enough for the field touched.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Chunk(NonNull<u8>);

impl Chunk {
    /// Wrap a raw chunk-start pointer.
    #[inline]
    pub const fn new(base: NonNull<u8>) -> Self {
        Self(base)
    }

    /// Recover the chunk whose payload starts at `user_ptr`.
    ///
    /// # Safety
    /// `user_ptr` must have been returned by a prior `alloc` against a
    /// chunk on the small path (i.e. `user_ptr - HEADER_BYTES` is a valid
    /// chunk start).
    #[inline]
    pub unsafe fn from_user_ptr(user_ptr: NonNull<u8>) -> Self {
        let base = unsafe { user_ptr.as_ptr().sub(HEADER_BYTES) };
        Self(NonNull::new_unchecked(base))
    }

    #[inline]
    pub fn as_ptr(self) -> *mut u8 {
        self.0.as_ptr()
    }

    #[inline]
    pub fn as_non_null(self) -> NonNull<u8> {
        self.0
    }

    /// The user-visible payload pointer, `self + HEADER_BYTES`.
    #[inline]
    pub fn payload_ptr(self) -> NonNull<u8> {
        unsafe { NonNull::new_unchecked(self.0.as_ptr().add(HEADER_BYTES)) }
    }

    /// Read the 8-byte size header.
    #[inline]
    pub unsafe fn size(self) -> usize {
        unsafe { self.0.as_ptr().cast::<usize>().read() }
    }

    /// Write the 8-byte size header.
    #[inline]
    pub unsafe fn set_size(self, size: usize) {
        unsafe { self.0.as_ptr().cast::<usize>().write(size) };
    }

    /// Read the `prev` link (offset +8). Only meaningful while the chunk
    /// sits on a free-list.
    #[inline]
    pub unsafe fn prev(self) -> Option<Chunk> {
        let raw = unsafe { self.0.as_ptr().add(PREV_OFFSET).cast::<*mut u8>().read() };
        NonNull::new(raw).map(Chunk)
    }

    #[inline]
    pub unsafe fn set_prev(self, prev: Option<Chunk>) {
        let raw = prev.map_or(core::ptr::null_mut(), |c| c.as_ptr());
        unsafe { self.0.as_ptr().add(PREV_OFFSET).cast::<*mut u8>().write(raw) };
    }

    /// Read the `next` link (offset +16). Only meaningful while the chunk
    /// sits on a free-list.
    #[inline]
    pub unsafe fn next(self) -> Option<Chunk> {
        let raw = unsafe { self.0.as_ptr().add(NEXT_OFFSET).cast::<*mut u8>().read() };
        NonNull::new(raw).map(Chunk)
    }

    #[inline]
    pub unsafe fn set_next(self, next: Option<Chunk>) {
        let raw = next.map_or(core::ptr::null_mut(), |c| c.as_ptr());
        unsafe { self.0.as_ptr().add(NEXT_OFFSET).cast::<*mut u8>().write(raw) };
    }
}

// SAFETY: a `Chunk` is a bare pointer into pool memory; the pool's own
// locking discipline (per-class `SpinMutex`, atomic cursor) is what makes
// sharing it across threads sound, not anything inherent to the pointer.
unsafe impl Send for Chunk {}
