use std::fmt;

use super::Buffer::ConcurrentVec;

// Debug proxy implementation that calls the standalone debug function
impl<T: Copy> fmt::Debug for ConcurrentVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_concurrent_vec(self, f)
    }
}
