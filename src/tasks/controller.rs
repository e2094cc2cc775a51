//! Presentation controller event loop
//!
//! Owns the countdown lifecycle as a single-task state machine: commands come
//! in over an mpsc channel, engine ticks over another, and every display
//! change goes out on a watch channel the HTTP surface reads from. Keeping
//! the phase inside one task means ticks, blinks and commands can never race
//! on shared state.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    services::ShutdownScheduler,
    state::{
        countdown_state::{ControllerError, CountdownStatus, PhaseKind},
        display::{format_hms, DisplayState, ALARM, NEUTRAL},
        selection::DurationSelection,
    },
};

use super::countdown::EngineHandle;

/// Toggle period of the blink alert.
pub const BLINK_PERIOD: Duration = Duration::from_millis(200);
/// Number of color toggles before the blink alert resets to idle.
pub const BLINK_TOGGLE_LIMIT: u8 = 10;

/// Commands accepted by the controller task. Replies go over oneshots so
/// start and stop are synchronous from the caller's perspective.
#[derive(Debug)]
pub enum Command {
    Start {
        total_seconds: u64,
        schedule_shutdown: bool,
        reply: oneshot::Sender<Result<(), ControllerError>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
}

/// Countdown lifecycle phase. Holding the engine handle inside `Counting`
/// makes "blinking while an engine runs" unrepresentable.
enum Phase {
    Idle,
    Counting {
        engine: EngineHandle,
        deadline: DateTime<Utc>,
    },
    Blinking {
        toggles: u8,
    },
}

pub struct Controller {
    scheduler: Arc<dyn ShutdownScheduler>,
    selection: Arc<Mutex<DurationSelection>>,
    status_tx: watch::Sender<CountdownStatus>,
    tick_tx: mpsc::Sender<u64>,
    tick_rx: mpsc::Receiver<u64>,
    phase: Phase,
}

/// Spawn the controller with its command and status channels wired up.
pub fn spawn(
    scheduler: Arc<dyn ShutdownScheduler>,
    selection: Arc<Mutex<DurationSelection>>,
) -> (
    mpsc::Sender<Command>,
    watch::Receiver<CountdownStatus>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (status_tx, status_rx) = watch::channel(CountdownStatus::idle());
    let controller = Controller::new(scheduler, selection, status_tx);
    let handle = tokio::spawn(controller_task(controller, cmd_rx));
    (cmd_tx, status_rx, handle)
}

/// Event loop processing commands, engine ticks and blink toggles.
pub async fn controller_task(mut ctl: Controller, mut cmd_rx: mpsc::Receiver<Command>) {
    info!("Starting countdown controller task");

    let mut blink = tokio::time::interval(BLINK_PERIOD);
    blink.set_missed_tick_behavior(MissedTickBehavior::Delay);

    enum Event {
        Command(Option<Command>),
        Tick(u64),
        Blink,
    }

    loop {
        let event = tokio::select! {
            cmd = cmd_rx.recv() => Event::Command(cmd),
            tick = ctl.tick_rx.recv() => match tick {
                Some(remaining) => Event::Tick(remaining),
                // The controller holds a sender clone, so this cannot happen.
                None => continue,
            },
            _ = blink.tick(), if matches!(ctl.phase, Phase::Blinking { .. }) => Event::Blink,
        };

        match event {
            Event::Command(Some(Command::Start {
                total_seconds,
                schedule_shutdown,
                reply,
            })) => {
                let _ = reply.send(ctl.handle_start(total_seconds, schedule_shutdown));
            }
            Event::Command(Some(Command::Stop { reply })) => {
                ctl.handle_stop().await;
                let _ = reply.send(());
            }
            Event::Command(None) => {
                debug!("Command channel closed, controller task exiting");
                break;
            }
            Event::Tick(remaining) => ctl.on_tick(remaining, &mut blink).await,
            Event::Blink => ctl.on_blink_tick(),
        }
    }
}

impl Controller {
    pub fn new(
        scheduler: Arc<dyn ShutdownScheduler>,
        selection: Arc<Mutex<DurationSelection>>,
        status_tx: watch::Sender<CountdownStatus>,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(8);
        Self {
            scheduler,
            selection,
            status_tx,
            tick_tx,
            tick_rx,
            phase: Phase::Idle,
        }
    }

    fn handle_start(
        &mut self,
        total_seconds: u64,
        schedule_shutdown: bool,
    ) -> Result<(), ControllerError> {
        if !matches!(self.phase, Phase::Idle) {
            warn!("Rejecting start request while a countdown is active");
            return Err(ControllerError::AlreadyRunning);
        }
        if total_seconds == 0 {
            warn!("Rejecting start request with zero duration");
            return Err(ControllerError::ZeroDuration);
        }

        if schedule_shutdown {
            self.scheduler.schedule(total_seconds);
        } else {
            info!("Shutdown disarmed, running display-only countdown");
        }

        let deadline = Utc::now() + chrono::Duration::seconds(total_seconds as i64);
        let engine = EngineHandle::spawn(total_seconds, self.tick_tx.clone());
        self.phase = Phase::Counting { engine, deadline };
        self.publish_counting(total_seconds, deadline);

        info!(
            "Countdown started for {} ({}s), deadline {}",
            format_hms(total_seconds),
            total_seconds,
            deadline
        );
        Ok(())
    }

    async fn on_tick(&mut self, remaining: u64, blink: &mut Interval) {
        let deadline = match self.phase {
            Phase::Counting { deadline, .. } => deadline,
            // Guards against ticks buffered before a stop was processed.
            _ => {
                debug!("Ignoring stale tick ({}s remaining)", remaining);
                return;
            }
        };

        if remaining > 0 {
            self.publish_counting(remaining, deadline);
            return;
        }

        // Expiry: the engine exits by itself after the final zero, reap it
        // and switch to the blink alert.
        if let Phase::Counting { engine, .. } =
            std::mem::replace(&mut self.phase, Phase::Blinking { toggles: 0 })
        {
            engine.stop().await;
        }
        self.drain_stale_ticks();
        blink.reset();

        let _ = self.status_tx.send(CountdownStatus {
            phase: PhaseKind::Blinking,
            display: DisplayState::zero(ALARM),
            remaining_seconds: Some(0),
            deadline: None,
        });
        info!("Countdown expired, starting blink alert");
    }

    fn on_blink_tick(&mut self) {
        let toggles = match &self.phase {
            Phase::Blinking { toggles } => *toggles + 1,
            _ => return,
        };

        if toggles >= BLINK_TOGGLE_LIMIT {
            self.phase = Phase::Idle;
            let _ = self.status_tx.send(CountdownStatus::idle());
            info!("Blink alert finished, display reset");
            return;
        }

        self.phase = Phase::Blinking { toggles };
        let color = if toggles % 2 == 0 { ALARM } else { NEUTRAL };
        let _ = self.status_tx.send(CountdownStatus {
            phase: PhaseKind::Blinking,
            display: DisplayState::zero(color),
            remaining_seconds: Some(0),
            deadline: None,
        });
    }

    /// Stop always runs to completion: cancel the scheduled shutdown, tear
    /// the engine down, clear the selection and reset the display.
    async fn handle_stop(&mut self) {
        // Cancel is unconditional, even when nothing was armed or running.
        let cancel = self.scheduler.cancel();

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Counting { engine, .. } => engine.stop().await,
            Phase::Blinking { .. } => debug!("Stopping during blink alert"),
            Phase::Idle => {}
        }
        self.drain_stale_ticks();

        // Do not ack the stop until the cancel command has run, so it cannot
        // be lost to runtime teardown on process exit. Its outcome is ignored.
        let _ = cancel.await;

        if let Ok(mut selection) = self.selection.lock() {
            selection.reset();
        }

        let _ = self.status_tx.send(CountdownStatus::idle());
        info!("Countdown stopped, display reset");
    }

    fn publish_counting(&self, remaining: u64, deadline: DateTime<Utc>) {
        let _ = self.status_tx.send(CountdownStatus {
            phase: PhaseKind::Counting,
            display: DisplayState::counting(remaining),
            remaining_seconds: Some(remaining),
            deadline: Some(deadline),
        });
    }

    /// Discard ticks buffered while a stop or expiry was being handled. Only
    /// safe once the engine has fully terminated.
    fn drain_stale_ticks(&mut self) {
        while self.tick_rx.try_recv().is_ok() {}
    }
}
