//! Shutdown Timer - schedule an OS shutdown with a live countdown
//!
//! This library turns a user-selected duration into a scheduled OS shutdown
//! plus an independently ticking countdown display with warning colors and a
//! blink alert at zero. The countdown engine and presentation controller live
//! in [`tasks`]; the thin HTTP surface a front end drives is in [`api`].

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
