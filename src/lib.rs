// Module naming follows project convention (Collect = the event collection plane)
#[allow(non_snake_case)]
pub mod Collect {
    pub mod Buffer {
        pub mod Buffer;
        pub mod Buffer_impl;
        mod debug;
        pub use Buffer::ConcurrentVec; // re-export for stable path
    }
}
#[allow(non_snake_case)]
pub mod Core {
    pub mod alloc;
}
#[allow(non_snake_case)]
pub mod Debug {
    pub mod StructDebug;
}
