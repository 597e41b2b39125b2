//! End-to-end boundary behavior at the small/large split and the exact
//! header/list layout a pool produces for a handful of concrete requests.

use arenapool::config::MIN_POOL_BYTES;
use arenapool::size_class::{class_of, total_chunk_size};
use arenapool::Pool;

fn fresh_pool() -> Box<Pool> {
    Pool::init(MIN_POOL_BYTES, false).expect("pool_init should succeed")
}

#[test]
fn basic_allocation_header() {
    let pool = fresh_pool();
    let ptr = pool.alloc(32).expect("alloc(32)");

    // The 8 bytes preceding the payload hold the total chunk size.
    let header = unsafe { (ptr.as_ptr().sub(8) as *const usize).read() };
    assert_eq!(header, 40);

    unsafe { pool.free(ptr) };
    let ptr2 = pool.alloc(32).expect("alloc(32) again");
    assert_eq!(ptr2, ptr, "freed chunk must be reused before bumping further");
}

#[test]
fn freelist_placement() {
    let pool = fresh_pool();
    let ptr = pool.alloc(16).expect("alloc(16)");
    unsafe { pool.free(ptr) };

    let head = pool
        .freelist_head(1)
        .expect("class 1 (total 24) should be non-empty");
    let header = unsafe { (head.as_ptr() as *const usize).read() };
    assert_eq!(header, 24);
}

#[test]
fn lifo_two_chunk_list() {
    let pool = fresh_pool();
    let a = pool.alloc(40).expect("alloc a");
    let b = pool.alloc(40).expect("alloc b");
    unsafe {
        core::ptr::write_bytes(a.as_ptr(), 0xFF, 40);
        core::ptr::write_bytes(b.as_ptr(), 0xFE, 40);
        pool.free(a);
        pool.free(b);
    }

    // total = 48 -> class 4
    let head = pool.freelist_head(4).expect("class 4 non-empty");
    let b_chunk = unsafe { b.as_ptr().sub(8) };
    assert_eq!(head.as_ptr(), b_chunk);
}

#[test]
fn class_coverage_table() {
    for t in (16..=264).step_by(8) {
        assert_eq!(class_of(t), Some(((t - 16) / 8) as u8));
    }
    for t in [272usize, 280] {
        assert_eq!(class_of(t), None);
    }
}

#[test]
fn requests_zero_one_eight_all_land_in_class_zero() {
    for requested in [0usize, 1, 8] {
        assert_eq!(total_chunk_size(requested), 16);
        assert_eq!(class_of(total_chunk_size(requested)), Some(0));
    }
}

#[test]
fn request_nine_lands_in_class_one() {
    assert_eq!(total_chunk_size(9), 24);
    assert_eq!(class_of(total_chunk_size(9)), Some(1));
}

#[test]
fn large_bypass() {
    let pool = fresh_pool();
    let ptr = pool.alloc(4096).expect("alloc(4096)");

    let base = pool_base_addr(&pool);
    let addr = ptr.as_ptr() as usize;
    // A large allocation is never carved from the pool's own bump region.
    assert!(addr < base || addr >= base + pool.capacity());

    let header = unsafe { (ptr.as_ptr().sub(8) as *const usize).read() };
    assert_eq!(header, 4104);

    unsafe { pool.free(ptr) };
}

fn pool_base_addr(pool: &Pool) -> usize {
    // A class-0 bump allocation always lands at offset 0 of the region,
    // so its payload pointer minus the header is the pool's base address.
    let probe = pool.alloc(1).expect("probe alloc");
    let base = probe.as_ptr() as usize - 8;
    unsafe { pool.free(probe) };
    base
}

#[test]
fn pool_init_rounds_capacity_up_to_min_pool_bytes() {
    let pool = Pool::init(1, false).expect("tiny request still succeeds");
    assert_eq!(pool.capacity(), MIN_POOL_BYTES);
}
