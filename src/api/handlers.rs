//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, ControllerError, Preset};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

fn respond(
    state: &AppState,
    status: &str,
    message: String,
) -> Result<Json<ApiResponse>, StatusCode> {
    let selection = state.get_selection().map_err(internal)?;
    Ok(Json(ApiResponse::new(
        status,
        message,
        selection,
        state.countdown(),
    )))
}

fn internal(e: ControllerError) -> StatusCode {
    error!("Controller failure: {}", e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle POST /start - schedule the shutdown and start the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("start");
    match state.start_countdown().await {
        Ok(total_seconds) => {
            info!("Start endpoint called, countdown running for {}s", total_seconds);
            respond(
                &state,
                "started",
                format!(
                    "Countdown started for {}",
                    crate::state::format_hms(total_seconds)
                ),
            )
        }
        Err(ControllerError::ZeroDuration) => {
            warn!("Start rejected: selection is zero");
            respond(
                &state,
                "warning",
                "Set a duration greater than zero".to_string(),
            )
        }
        Err(ControllerError::AlreadyRunning) => respond(
            &state,
            "warning",
            "A countdown is already running".to_string(),
        ),
        Err(e) => Err(internal(e)),
    }
}

/// Handle POST /stop - cancel the shutdown and reset the countdown
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("stop");
    state.stop_countdown().await.map_err(internal)?;
    info!("Stop endpoint called, countdown reset");
    respond(
        &state,
        "stopped",
        "Countdown stopped and shutdown cancelled".to_string(),
    )
}

/// Handle POST /arm - issue the OS shutdown call on the next start
pub async fn arm_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("arm");
    state.set_armed(true);
    respond(&state, "armed", "Shutdown will be scheduled on start".to_string())
}

/// Handle POST /disarm - run display-only countdowns
pub async fn disarm_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("disarm");
    state.set_armed(false);
    respond(
        &state,
        "disarmed",
        "Countdown will run without scheduling a shutdown".to_string(),
    )
}

/// Handle POST /preset/:preset - apply a duration preset to the selection
pub async fn preset_handler(
    Path(preset): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action(&format!("preset:{}", preset));
    match preset.parse::<Preset>() {
        Ok(preset) => {
            let selection = state.apply_preset(preset).map_err(internal)?;
            respond(
                &state,
                "ok",
                format!(
                    "Selection set to {}",
                    crate::state::format_hms(selection.total_seconds())
                ),
            )
        }
        Err(e) => {
            warn!("{}", e);
            respond(&state, "warning", e.to_string())
        }
    }
}

/// Handle POST /reset - clear the duration selection
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.record_action("reset");
    state.reset_selection().map_err(internal)?;
    respond(&state, "ok", "Selection cleared".to_string())
}

/// Handle GET /status - full countdown and selection snapshot
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let selection = state.get_selection().map_err(internal)?;
    let (last_action, last_action_time) = state.last_action();

    Ok(Json(StatusResponse {
        countdown: state.countdown(),
        selection,
        selected_total_seconds: selection.total_seconds(),
        armed: state.is_armed(),
        uptime: state.uptime(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
