use std::cmp;
use std::mem::{align_of, size_of};
use std::ptr;
use std::slice;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize};
use std::thread;
use std::time::Duration;

use crossbeam_utils::CachePadded;
use parking_lot::lock_api::RawRwLock as _;
use parking_lot::RawRwLock;

use super::Buffer::ConcurrentVec;
use crate::Core::alloc;

/// Delay between polls of the grow-in-progress flag inside `swap`.
const GROW_POLL_DELAY: Duration = Duration::from_millis(1);

impl<T: Copy> ConcurrentVec<T> {
    /// Create a buffer with room for `capacity` records.
    ///
    /// Storage is allocated exactly once here; the append path never
    /// allocates unless a reservation overflows the current capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. A zero-capacity buffer is a contract
    /// violation, not a recoverable error.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity != 0, "ConcurrentVec requires a non-zero initial capacity");
        assert!(size_of::<T>() != 0, "zero-sized record types are not supported");

        let ptr = alloc::allocate(capacity * size_of::<T>(), align_of::<T>()) as *mut T;
        Self {
            ptr: AtomicPtr::new(ptr),
            lock: RawRwLock::INIT,
            tail: CachePadded::new(AtomicUsize::new(0)),
            size: CachePadded::new(AtomicUsize::new(0)),
            grow_in_progress: AtomicBool::new(false),
            capacity: AtomicUsize::new(capacity),
        }
    }

    /// Number of published records. Unsynchronized; see the type-level
    /// contract.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.load(Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Relaxed)
    }

    /// Count of reserved slots, published or not. `reserved() == len()`
    /// exactly when no reservation is outstanding.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.tail.load(Relaxed)
    }

    /// True while a growth reallocation is in flight.
    #[inline]
    pub fn is_growing(&self) -> bool {
        self.grow_in_progress.load(Relaxed)
    }

    /// Raw base pointer of the storage. Invalidated by growth and swap.
    #[inline]
    pub fn data(&self) -> *mut T {
        self.ptr.load(Relaxed)
    }

    /// View of the published range `[0, len)`.
    ///
    /// # Safety
    /// Caller must guarantee no producer commits and no growth or swap
    /// relocates the storage while the slice is alive (single-consumer
    /// discipline, e.g. the maintenance thread between swaps).
    #[inline]
    pub unsafe fn as_slice(&self) -> &[T] {
        slice::from_raw_parts(self.data(), self.len())
    }

    /// First published record.
    ///
    /// # Safety
    /// Same contract as [`as_slice`](Self::as_slice).
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    pub unsafe fn front(&self) -> &T {
        assert!(!self.is_empty());
        &*self.data()
    }

    /// Most recently reserved record.
    ///
    /// # Safety
    /// Same contract as [`as_slice`](Self::as_slice).
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    pub unsafe fn back(&self) -> &T {
        assert!(!self.is_empty());
        &*self.data().add(self.tail.load(Relaxed) - 1)
    }

    /// Record at `index`. No bounds check.
    ///
    /// # Safety
    /// `index < len()`, plus the contract of [`as_slice`](Self::as_slice).
    #[inline]
    pub unsafe fn get(&self, index: usize) -> &T {
        &*self.data().add(index)
    }

    /// Reserve `count` contiguous slots and return a pointer to the first.
    ///
    /// The shared lock is acquired here and stays held until the matching
    /// [`commit_next`](Self::commit_next); any number of producers may hold
    /// it simultaneously. The reserved range `[tail, tail + count)` is
    /// exclusive to the caller but not yet visible through `len()`.
    ///
    /// If the reservation overflows the current capacity, the calling thread
    /// alone pays for the reallocation: it raises the grow-in-progress flag,
    /// drops its shared hold, grows under the exclusive lock, then
    /// re-acquires shared mode. The returned pointer is always computed from
    /// the post-growth storage base and must be written and committed before
    /// any later growth can invalidate it.
    pub fn prepare_next(&self, count: usize) -> *mut T {
        self.lock.lock_shared();
        let index = self.tail.fetch_add(count, Relaxed);
        if index + count >= self.capacity.load(Relaxed) {
            self.grow_in_progress.store(true, Release);
            unsafe { self.lock.unlock_shared() };
            self.alloc_more(count);
            self.lock.lock_shared();
            self.grow_in_progress.store(false, Release);
        }
        unsafe { self.ptr.load(Acquire).add(index) }
    }

    /// Publish the `count` slots reserved by the matching
    /// [`prepare_next`](Self::prepare_next) and release the shared hold.
    ///
    /// Must be called exactly once per `prepare_next`, by the same thread,
    /// after the reserved slots have been written. An unmatched call is a
    /// contract violation.
    pub fn commit_next(&self, count: usize) {
        self.size.fetch_add(count, Release);
        unsafe { self.lock.unlock_shared() };
    }

    /// Grow storage so that `tail + count` slots fit. Called by the one
    /// producer whose reservation overflowed.
    fn alloc_more(&self, count: usize) {
        self.lock.lock_exclusive();
        let min_size = self.tail.load(Relaxed) + count;
        let capacity = self.capacity.load(Relaxed);
        if capacity < min_size {
            let new_capacity = cmp::max(capacity * 2, min_size);
            let new_ptr =
                alloc::allocate(new_capacity * size_of::<T>(), align_of::<T>()) as *mut T;
            let old_ptr = self.ptr.load(Relaxed);

            // Only published records need to move; the overflowing
            // reservation has not been written yet.
            unsafe {
                ptr::copy_nonoverlapping(old_ptr, new_ptr, self.size.load(Relaxed));
            }
            self.ptr.store(new_ptr, Release);
            self.capacity.store(new_capacity, Release);

            // Under the exclusive lock no producer can be mid-read of the
            // old storage, so the fast release path is valid.
            unsafe {
                alloc::free_fast(old_ptr as *mut u8, capacity * size_of::<T>(), align_of::<T>());
            }
        }
        unsafe { self.lock.unlock_exclusive() };
    }

    /// Exchange this buffer's entire state (storage, size, capacity) with
    /// `other`. Intended for the single maintenance thread handing off a
    /// full buffer while producers resume appending into an empty one.
    ///
    /// Blocks, with no timeout, while either buffer has a growth in flight.
    /// The caller's surrounding protocol must guarantee no producer holds an
    /// outstanding reservation: `size == tail` is asserted on both buffers,
    /// but a reservation taken after the check would land its records in the
    /// wrong buffer.
    pub fn swap(&self, other: &Self) {
        // A reallocation in flight would move storage between the flag poll
        // and the pointer exchange; wait it out on both sides first.
        while self.grow_in_progress.load(Acquire) || other.grow_in_progress.load(Acquire) {
            thread::sleep(GROW_POLL_DELAY);
        }

        // Fixed order: self, then other.
        self.lock.lock_exclusive();
        other.lock.lock_exclusive();

        let size1 = self.size.load(Relaxed);
        let size2 = other.size.load(Relaxed);
        assert_eq!(
            size1,
            self.tail.load(Relaxed),
            "swap with an outstanding reservation"
        );
        assert_eq!(
            size2,
            other.tail.load(Relaxed),
            "swap with an outstanding reservation"
        );

        let ptr1 = self.ptr.load(Relaxed);
        let ptr2 = other.ptr.load(Relaxed);
        let capacity1 = self.capacity.load(Relaxed);
        let capacity2 = other.capacity.load(Relaxed);

        self.ptr.store(ptr2, Relaxed);
        self.size.store(size2, Relaxed);
        self.tail.store(size2, Relaxed);
        self.capacity.store(capacity2, Relaxed);

        other.ptr.store(ptr1, Relaxed);
        other.size.store(size1, Relaxed);
        other.tail.store(size1, Relaxed);
        other.capacity.store(capacity1, Relaxed);

        unsafe {
            other.lock.unlock_exclusive();
            self.lock.unlock_exclusive();
        }
    }

    /// Discard all published content. Storage and capacity are kept and no
    /// per-record teardown runs (`T: Copy`).
    pub fn clear(&self) {
        self.lock.lock_exclusive();
        self.tail.store(0, Relaxed);
        self.size.store(0, Relaxed);
        unsafe { self.lock.unlock_exclusive() };
    }

    /// Visit every published record in index order, then discard them all.
    ///
    /// Hands records off one at a time without a wholesale buffer swap.
    /// Producers attempting to append block for the duration of the visit.
    pub fn drain(&self, mut visitor: impl FnMut(&T)) {
        self.lock.lock_exclusive();
        let size = self.size.load(Relaxed);
        let base = self.ptr.load(Relaxed);
        for i in 0..size {
            visitor(unsafe { &*base.add(i) });
        }
        self.tail.store(0, Relaxed);
        self.size.store(0, Relaxed);
        unsafe { self.lock.unlock_exclusive() };
    }
}

impl<T: Copy> Drop for ConcurrentVec<T> {
    fn drop(&mut self) {
        // No per-record teardown: T is trivially copyable by bound.
        let capacity = self.capacity.load(Relaxed);
        unsafe {
            alloc::free(
                self.ptr.load(Relaxed) as *mut u8,
                capacity * size_of::<T>(),
                align_of::<T>(),
            );
        }
    }
}
