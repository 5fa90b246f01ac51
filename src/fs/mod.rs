//! Filesystem utilities.
//!
//! Documents are only ever replaced atomically so that an interrupted save
//! cannot leave a half-written nuget.config behind.

pub mod atomic;

pub use atomic::atomic_write_file;
