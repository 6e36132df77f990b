use super::*;

/// Point-in-time snapshot of the allocator accounting counters.
///
/// Counters are read individually with relaxed ordering, so a snapshot taken
/// while allocations are in flight may be internally inconsistent. Intended
/// for tests and monitoring, not for synchronization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocStats {
    pub live_bytes: usize,
    pub total_bytes: usize,
    pub peak_live_bytes: usize,
    pub allocations: usize,
    pub frees: usize,
}

/// Bytes currently allocated and not yet freed.
pub fn live_bytes() -> usize {
    LIVE_BYTES.load(Relaxed)
}

/// Cumulative bytes handed out since process start.
pub fn total_bytes() -> usize {
    TOTAL_BYTES.load(Relaxed)
}

/// High-water mark of [`live_bytes`].
pub fn peak_live_bytes() -> usize {
    PEAK_LIVE_BYTES.load(Relaxed)
}

/// Number of completed `allocate` calls.
pub fn allocations() -> usize {
    ALLOC_COUNT.load(Relaxed)
}

/// Number of completed `free` / `free_fast` calls.
pub fn frees() -> usize {
    FREE_COUNT.load(Relaxed)
}

pub fn snapshot() -> AllocStats {
    AllocStats {
        live_bytes: live_bytes(),
        total_bytes: total_bytes(),
        peak_live_bytes: peak_live_bytes(),
        allocations: allocations(),
        frees: frees(),
    }
}
