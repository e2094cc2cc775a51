//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{CountdownStatus, DurationSelection};

/// Response body for the action endpoints (start, stop, arm, preset, reset).
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub selection: DurationSelection,
    pub countdown: CountdownStatus,
}

impl ApiResponse {
    pub fn new(
        status: &str,
        message: String,
        selection: DurationSelection,
        countdown: CountdownStatus,
    ) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            selection,
            countdown,
        }
    }
}

/// Full status snapshot returned by GET /status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub countdown: CountdownStatus,
    pub selection: DurationSelection,
    pub selected_total_seconds: u64,
    pub armed: bool,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
