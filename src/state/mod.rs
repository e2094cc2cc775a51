//! State management module
//!
//! Structures describing the countdown lifecycle, the display model and the
//! user's duration selection.

pub mod app_state;
pub mod countdown_state;
pub mod display;
pub mod selection;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{ControllerError, CountdownStatus, PhaseKind};
pub use display::{format_hms, Color, DisplayState};
pub use selection::{DurationSelection, Preset};
