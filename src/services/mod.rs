//! External system call module
//!
//! The opaque OS shutdown scheduler the controller fires into.

pub mod shutdown;

// Re-export main types
pub use shutdown::{ShutdownScheduler, SystemShutdown};
