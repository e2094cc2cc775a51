//! Countdown status snapshots and controller errors

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::display::DisplayState;

/// Externally visible lifecycle phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Counting,
    Blinking,
}

/// Snapshot published by the controller task after every state change.
#[derive(Debug, Clone, Serialize)]
pub struct CountdownStatus {
    pub phase: PhaseKind,
    pub display: DisplayState,
    pub remaining_seconds: Option<u64>,
    pub deadline: Option<DateTime<Utc>>,
}

impl CountdownStatus {
    /// The resting state: zeroed display in neutral color.
    pub fn idle() -> Self {
        Self {
            phase: PhaseKind::Idle,
            display: DisplayState::default(),
            remaining_seconds: None,
            deadline: None,
        }
    }
}

impl Default for CountdownStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// Errors the controller reports back to the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("duration must be greater than zero")]
    ZeroDuration,
    #[error("a countdown is already running")]
    AlreadyRunning,
    #[error("countdown controller is not running")]
    Unavailable,
    #[error("internal state error: {0}")]
    Internal(String),
}
