//! Concurrent bump/free-list traffic against a single shared pool.
//!
//! Patterned on fill-pattern corruption detection: each live allocation is
//! stamped with a value derived from its own address, and checked for
//! corruption right before it is freed. Any aliasing between concurrent
//! allocations would show up as a mismatch.

use std::sync::Arc;

use arenapool::Pool;

fn fill_pattern(ptr: *mut u8, size: usize) {
    let seed = ptr as usize;
    for i in 0..size {
        unsafe {
            *ptr.add(i) = ((seed.wrapping_add(i).wrapping_mul(0x9E37_79B9)) & 0xFF) as u8;
        }
    }
}

fn check_pattern(ptr: *mut u8, size: usize) -> bool {
    let seed = ptr as usize;
    for i in 0..size {
        let expected = ((seed.wrapping_add(i).wrapping_mul(0x9E37_79B9)) & 0xFF) as u8;
        if unsafe { *ptr.add(i) } != expected {
            return false;
        }
    }
    true
}

#[test]
fn concurrent_bump_and_reuse_no_aliasing() {
    let pool = Arc::new(Pool::init(1 << 21, true).expect("init concurrent pool"));
    let nthreads = 8;
    let ops_per_thread = 20_000;

    let handles: Vec<_> = (0..nthreads)
        .map(|_| {
            let pool = Arc::clone(&pool);
            std::thread::spawn(move || {
                for _ in 0..ops_per_thread {
                    let ptr = pool.alloc(24).expect("alloc should not fail");
                    fill_pattern(ptr.as_ptr(), 24);
                    assert!(check_pattern(ptr.as_ptr(), 24), "corruption right after fill");
                    unsafe { pool.free(ptr) };
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let snap = pool.stats().expect("stats enabled");
    assert_eq!(snap.small_in_use_bytes, 0);
    assert!(snap.free_list_bytes as usize <= pool.capacity());
}

#[test]
fn cross_thread_free_of_another_threads_allocation() {
    use std::sync::mpsc;

    let pool = Arc::new(Pool::init(1 << 20, true).expect("init"));
    let (tx, rx) = mpsc::channel::<usize>();

    let producer_pool = Arc::clone(&pool);
    let producer = std::thread::spawn(move || {
        for _ in 0..2_000 {
            let ptr = producer_pool.alloc(40).unwrap();
            fill_pattern(ptr.as_ptr(), 40);
            tx.send(ptr.as_ptr() as usize).unwrap();
        }
    });

    let consumer_pool = Arc::clone(&pool);
    let consumer = std::thread::spawn(move || {
        let mut count = 0;
        for addr in rx {
            let ptr = addr as *mut u8;
            assert!(check_pattern(ptr, 40), "cross-thread corruption");
            unsafe {
                consumer_pool.free(core::ptr::NonNull::new_unchecked(ptr));
            }
            count += 1;
        }
        count
    });

    producer.join().unwrap();
    let total: usize = consumer.join().unwrap();
    assert_eq!(total, 2_000);
}
