//! Process-wide pool policy, resolved at build time from `arenapool.toml`.
//!
//! See `build.rs`. `MIN_POOL_BYTES` and `MAX_POOLS` are the only knobs —
//! size-class geometry is fixed (see [`crate::size_class`]) because the
//! free-list chunk layout depends on it.

include!(concat!(env!("OUT_DIR"), "/config_gen.rs"));

/// Assumed page granularity, used only by the `miri` platform shim to pick
/// an alignment for its `std::alloc`-backed stand-in mappings. Real mmap
/// and VirtualAlloc calls already return page-aligned memory on their own;
/// this is not a tunable and has no effect outside `#[cfg(miri)]` builds.
pub const PAGE_SIZE: usize = 4096;
