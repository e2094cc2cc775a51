//! Background tasks module
//!
//! The countdown engine and the presentation controller event loop.

pub mod controller;
pub mod countdown;

// Re-export main types
pub use controller::{controller_task, Command, Controller};
pub use countdown::EngineHandle;
