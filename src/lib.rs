#![no_std]

//! arenapool: a size-classed arena allocator with a segregated free-list
//! cache and a large-object bypass.
//!
//! Callers create one or more [`pool::Pool`]s, each backed by a single
//! large anonymous mapping, and allocate/free against a specific pool.
//! Small allocations are carved from the pool by bumping a monotonic
//! cursor; freed small allocations are retained on per-size-class
//! free-lists and reused LIFO before any further bump. Large allocations
//! are satisfied by direct anonymous mappings and returned to the
//! operating system on release.
//!
//! # Usage
//!
//! ```ignore
//! let pool = arenapool::Pool::init(1 << 20, false)?;
//! let ptr = pool.alloc(32)?;
//! unsafe { pool.free(ptr) };
//! ```

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod chunk;
pub mod config;
pub mod error;
pub mod free_list;
pub mod platform;
pub mod pool;
pub mod size_class;
pub mod stats;
pub mod sync;

pub use error::PoolError;
pub use pool::{pool_free, Pool};
