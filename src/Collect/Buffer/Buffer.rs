// This is the append-mostly collection buffer shared by many producer threads

use crossbeam_utils::CachePadded;
use parking_lot::RawRwLock;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize};

/// A concurrent, growable, append-mostly vector of fixed-layout records.
///
/// Producers append through a two-phase reserve/publish protocol and a single
/// maintenance thread periodically takes the collected records away in bulk.
///
/// ### Concurrency Design:
/// - **Producers (append)**: `prepare_next` claims a contiguous slot range by
///   atomically advancing `tail` while holding the lock in shared mode, the
///   caller writes the reserved slots, then `commit_next` publishes them by
///   advancing `size`. Concurrent reservations never overlap, and the common
///   path performs no allocation and takes no exclusive lock.
/// - **Maintenance (swap/clear/drain)**: runs under the exclusive lock, which
///   waits out every in-flight reservation before proceeding. Growth is paid
///   only by the producer whose reservation overflows the current capacity.
///
/// Element-level reads (`front`, `back`, `get`, `as_slice`) take no lock at
/// all. They are a single-consumer usage contract: the caller must guarantee
/// no concurrent growth can reallocate the storage out from under them. This
/// is deliberate and must stay that way; internal synchronization here would
/// defeat the producer latency target the structure exists for.
pub struct ConcurrentVec<T: Copy> {
    /// Base of the storage allocation. Replaced only under the exclusive
    /// lock (growth and swap).
    pub(crate) ptr: AtomicPtr<T>,

    /// The shared/exclusive lock. Held in shared mode across a whole
    /// `prepare_next`/`commit_next` pair, which is why the raw lock is used
    /// here instead of the guard-based `RwLock<T>`.
    pub(crate) lock: RawRwLock,

    /// Count of reserved slots. `[size, tail)` is claimed but not yet
    /// readable. Padded to keep producer fetch-adds off the published
    /// cursor's cache line.
    pub(crate) tail: CachePadded<AtomicUsize>,

    /// Count of published slots. `[0, size)` is the readable range.
    pub(crate) size: CachePadded<AtomicUsize>,

    /// Set while a reallocation is under way. `swap` polls this on both
    /// buffers before taking either exclusive lock.
    pub(crate) grow_in_progress: AtomicBool,

    /// Allocated slot count. Mutated only under the exclusive lock; read
    /// racily on the reserve path to detect overflow.
    pub(crate) capacity: AtomicUsize,
}

// T: Send is enough for Sync: producers only move T values in through &self,
// they never hand references out across threads.
unsafe impl<T: Copy + Send> Send for ConcurrentVec<T> {}
unsafe impl<T: Copy + Send> Sync for ConcurrentVec<T> {}
