//! Shared application state behind the control API

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

use crate::tasks::controller::Command;

use super::{
    countdown_state::{ControllerError, CountdownStatus},
    display::format_hms,
    selection::{DurationSelection, Preset},
};

/// State shared by the HTTP handlers. The countdown itself lives inside the
/// controller task and is reached only through the command channel.
pub struct AppState {
    selection: Arc<Mutex<DurationSelection>>,
    armed: AtomicBool,
    cmd_tx: mpsc::Sender<Command>,
    status_rx: watch::Receiver<CountdownStatus>,
    start_time: Instant,
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    pub fn new(
        cmd_tx: mpsc::Sender<Command>,
        status_rx: watch::Receiver<CountdownStatus>,
        selection: Arc<Mutex<DurationSelection>>,
        armed: bool,
    ) -> Self {
        Self {
            selection,
            armed: AtomicBool::new(armed),
            cmd_tx,
            status_rx,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
        }
    }

    /// Latest snapshot published by the controller.
    pub fn countdown(&self) -> CountdownStatus {
        self.status_rx.borrow().clone()
    }

    pub fn get_selection(&self) -> Result<DurationSelection, ControllerError> {
        self.selection
            .lock()
            .map(|selection| *selection)
            .map_err(|e| ControllerError::Internal(e.to_string()))
    }

    pub fn apply_preset(&self, preset: Preset) -> Result<DurationSelection, ControllerError> {
        let mut selection = self
            .selection
            .lock()
            .map_err(|e| ControllerError::Internal(e.to_string()))?;
        selection.apply_preset(preset);
        info!("Selection set to {}", format_hms(selection.total_seconds()));
        Ok(*selection)
    }

    pub fn reset_selection(&self) -> Result<DurationSelection, ControllerError> {
        let mut selection = self
            .selection
            .lock()
            .map_err(|e| ControllerError::Internal(e.to_string()))?;
        selection.reset();
        info!("Selection reset to zero");
        Ok(*selection)
    }

    /// Whether the OS shutdown call is actually issued on start.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    pub fn set_armed(&self, armed: bool) {
        info!("Shutdown toggle set to {}", armed);
        self.armed.store(armed, Ordering::Relaxed);
    }

    /// Start a countdown from the current selection, scheduling the OS
    /// shutdown when armed. Returns the total seconds on success; the
    /// controller has published the initial display by the time it replies.
    pub async fn start_countdown(&self) -> Result<u64, ControllerError> {
        let total_seconds = self.get_selection()?.total_seconds();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start {
                total_seconds,
                schedule_shutdown: self.is_armed(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| ControllerError::Unavailable)?;
        reply_rx.await.map_err(|_| ControllerError::Unavailable)??;
        Ok(total_seconds)
    }

    /// Cancel the scheduled shutdown and reset the countdown. Resolves only
    /// after the engine has fully terminated.
    pub async fn stop_countdown(&self) -> Result<(), ControllerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Stop { reply: reply_tx })
            .await
            .map_err(|_| ControllerError::Unavailable)?;
        reply_rx.await.map_err(|_| ControllerError::Unavailable)
    }

    pub fn record_action(&self, action: &str) {
        if let Ok(mut last) = self.last_action.lock() {
            *last = Some((action.to_string(), Utc::now()));
        }
    }

    pub fn last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock() {
            Ok(guard) => match &*guard {
                Some((action, time)) => (Some(action.clone()), Some(*time)),
                None => (None, None),
            },
            Err(_) => (None, None),
        }
    }

    /// Service uptime as a human-readable string.
    pub fn uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
