//! Allocator front-end backing buffer storage.
//!
//! All storage for `ConcurrentVec` goes through these three entry points so
//! the whole crate has a single accounted allocation path. Accounting is
//! kept in process-wide atomic counters, exposed through [`getters`].

use std::alloc::{alloc as sys_alloc, dealloc as sys_dealloc, handle_alloc_error, Layout};
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

mod getters;
pub use getters::{
    allocations, frees, live_bytes, peak_live_bytes, snapshot, total_bytes, AllocStats,
};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static TOTAL_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);
static FREE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Byte value `free` poisons released blocks with in debug builds.
#[cfg(debug_assertions)]
const POISON: u8 = 0xDD;

/// Allocate `size` bytes aligned to `align`.
///
/// Allocation failure is fatal: this aborts via `handle_alloc_error` rather
/// than returning null. There is no partial-failure path for callers to
/// roll back.
pub fn allocate(size: usize, align: usize) -> *mut u8 {
    let layout = Layout::from_size_align(size, align).expect("invalid storage layout");
    let ptr = unsafe { sys_alloc(layout) };
    if ptr.is_null() {
        handle_alloc_error(layout);
    }

    ALLOC_COUNT.fetch_add(1, Relaxed);
    TOTAL_BYTES.fetch_add(size, Relaxed);
    let live = LIVE_BYTES.fetch_add(size, Relaxed) + size;
    PEAK_LIVE_BYTES.fetch_max(live, Relaxed);
    ptr
}

/// Release a block obtained from [`allocate`].
///
/// In debug builds the block is poisoned first so a reader that retained a
/// stale pointer fails loudly instead of reading plausible data.
///
/// # Safety
/// `ptr` must come from [`allocate`] with the same `size` and `align`, and
/// must not be released twice.
pub unsafe fn free(ptr: *mut u8, size: usize, align: usize) {
    #[cfg(debug_assertions)]
    std::ptr::write_bytes(ptr, POISON, size);
    release(ptr, size, align);
}

/// Release a block that no concurrent reader can still observe.
///
/// Skips the debug poison step of [`free`]. Valid only when the caller holds
/// the buffer's exclusive lock (or otherwise knows every reader of the block
/// has finished), e.g. right after a growth copy.
///
/// # Safety
/// Same contract as [`free`], plus: no other thread may hold a pointer into
/// the block.
pub unsafe fn free_fast(ptr: *mut u8, size: usize, align: usize) {
    release(ptr, size, align);
}

unsafe fn release(ptr: *mut u8, size: usize, align: usize) {
    let layout = Layout::from_size_align(size, align).expect("invalid storage layout");
    sys_dealloc(ptr, layout);

    FREE_COUNT.fetch_add(1, Relaxed);
    LIVE_BYTES.fetch_sub(size, Relaxed);
}
