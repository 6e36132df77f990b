use std::fmt;

use crate::Collect::Buffer::ConcurrentVec;

/// Debug function for ConcurrentVec
///
/// Provides a safe debug representation that shows:
/// - Storage base pointer
/// - Published and reserved cursor values
/// - Capacity and grow-in-progress state
///
/// Cursor values are racy snapshots; the storage itself is never
/// dereferenced.
pub fn debug_concurrent_vec<T: Copy>(
    vec: &ConcurrentVec<T>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.debug_struct("ConcurrentVec")
        .field("ptr", &format_args!("{:p}", vec.data()))
        .field("len", &vec.len())
        .field("reserved", &vec.reserved())
        .field("capacity", &vec.capacity())
        .field("growing", &vec.is_growing())
        .finish_non_exhaustive()
}
