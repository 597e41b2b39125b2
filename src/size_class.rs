//! Size class derivation: maps a chunk's total byte span to one of
//! `NUM_CLASSES` fixed buckets, or `None` if it belongs on the large path.
//!
//! Classes are a straight linear progression (unlike a tcmalloc-style
//! table with per-class page/batch tuning) because the free-list chunk
//! layout fixes the stride: every class must be addressable as
//! `MIN_CLASS_BYTES + class * INCR_BYTES`.

/// Smallest total chunk size (header + payload), in bytes.
pub const MIN_CLASS_BYTES: usize = 16;
/// Stride between adjacent classes, in bytes.
pub const INCR_BYTES: usize = 8;
/// Number of small-class buckets.
pub const NUM_CLASSES: usize = 32;
/// Size of the in-band header every chunk carries at offset 0.
pub const HEADER_BYTES: usize = 8;

/// Total chunk size at which a request stops being "small". Exclusive:
/// a chunk of exactly this size routes through the large path.
pub const MAX_SMALL_CHUNK_BYTES: usize = MIN_CLASS_BYTES + INCR_BYTES * NUM_CLASSES;

#[inline]
const fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}

/// The total chunk size (header included) a request of `requested_bytes`
/// must carve out, before it is known whether that size is small or large.
#[inline]
pub const fn total_chunk_size(requested_bytes: usize) -> usize {
    if requested_bytes <= MIN_CLASS_BYTES - HEADER_BYTES {
        MIN_CLASS_BYTES
    } else {
        align_up(requested_bytes + HEADER_BYTES, INCR_BYTES)
    }
}

/// Map a chunk's total size to its class index, or `None` if it belongs
/// on the large path. `total_size` need not already be 8-aligned.
#[inline]
pub fn class_of(total_size: usize) -> Option<u8> {
    let aligned = align_up(total_size, INCR_BYTES);
    if aligned < MAX_SMALL_CHUNK_BYTES {
        let aligned = aligned.max(MIN_CLASS_BYTES);
        Some(((aligned - MIN_CLASS_BYTES) / INCR_BYTES) as u8)
    } else {
        None
    }
}

/// The total chunk size every member of `class` occupies.
#[inline]
pub const fn class_to_size(class: u8) -> usize {
    MIN_CLASS_BYTES + class as usize * INCR_BYTES
}
