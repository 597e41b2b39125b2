//! Failure sentinels for the two calls that can fail: [`crate::pool::pool_init`]
//! and [`crate::pool::Pool::alloc`]. `free`/`pool_free` are infallible from
//! the caller's perspective.

/// Resource-exhaustion failures. Programmer misuse (double free, a pointer
/// not obtained from this pool, use-after-`pool_free`) is undefined
/// behavior by contract and is caught with `debug_assert!` rather than
/// surfaced here — see the module docs on [`crate::pool`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// The mapping shim refused to hand back a region of the requested size.
    #[error("mapping shim failed to acquire {requested_bytes} bytes")]
    MappingFailed {
        /// Number of bytes that were requested from the mapping shim.
        requested_bytes: usize,
    },
    /// `MAX_POOLS` pools already coexist in this process.
    #[error("pool limit reached ({max} pools already live)")]
    PoolLimitReached {
        /// The process-wide pool cap that was hit.
        max: usize,
    },
    /// The pool's bump cursor cannot satisfy this request without
    /// exceeding capacity, and the free-list had nothing for this class.
    #[error("pool exhausted: cursor + {requested_total} bytes would exceed capacity {capacity}")]
    Exhausted {
        /// Total chunk size (including header) that was requested.
        requested_total: usize,
        /// The pool's total capacity in bytes.
        capacity: usize,
    },
}
