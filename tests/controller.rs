//! Controller scenarios driven with a recording shutdown scheduler under a
//! paused tokio clock, so the timing assertions are exact.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use shutdown_timer::{
    services::ShutdownScheduler,
    state::{
        display::{ALARM, NEUTRAL},
        ControllerError, CountdownStatus, DisplayState, DurationSelection, PhaseKind,
    },
    tasks::controller::{self, Command},
};
use tokio::sync::{mpsc, oneshot, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerCall {
    Schedule(u64),
    Cancel,
}

#[derive(Default)]
struct RecordingScheduler {
    calls: Mutex<Vec<SchedulerCall>>,
}

impl RecordingScheduler {
    fn calls(&self) -> Vec<SchedulerCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ShutdownScheduler for RecordingScheduler {
    fn schedule(&self, delay_seconds: u64) {
        self.calls
            .lock()
            .unwrap()
            .push(SchedulerCall::Schedule(delay_seconds));
    }

    fn cancel(&self) -> tokio::task::JoinHandle<()> {
        self.calls.lock().unwrap().push(SchedulerCall::Cancel);
        tokio::spawn(async {})
    }
}

struct Harness {
    scheduler: Arc<RecordingScheduler>,
    selection: Arc<Mutex<DurationSelection>>,
    cmd_tx: mpsc::Sender<Command>,
    status_rx: watch::Receiver<CountdownStatus>,
}

impl Harness {
    fn new() -> Self {
        let scheduler = Arc::new(RecordingScheduler::default());
        let selection = Arc::new(Mutex::new(DurationSelection::default()));
        let (cmd_tx, status_rx, _handle) = controller::spawn(
            Arc::clone(&scheduler) as Arc<dyn ShutdownScheduler>,
            Arc::clone(&selection),
        );
        Self {
            scheduler,
            selection,
            cmd_tx,
            status_rx,
        }
    }

    async fn start(&self, total_seconds: u64, schedule_shutdown: bool) -> Result<(), ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start {
                total_seconds,
                schedule_shutdown,
                reply,
            })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    async fn stop(&self) {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Stop { reply }).await.unwrap();
        rx.await.unwrap();
    }

    async fn wait_for_phase(&mut self, phase: PhaseKind) -> CountdownStatus {
        self.status_rx
            .wait_for(|status| status.phase == phase)
            .await
            .unwrap()
            .clone()
    }
}

#[tokio::test(start_paused = true)]
async fn five_second_run_blinks_then_resets() {
    let mut harness = Harness::new();
    let t0 = tokio::time::Instant::now();

    harness.start(5, true).await.unwrap();
    assert_eq!(harness.scheduler.calls(), vec![SchedulerCall::Schedule(5)]);
    {
        let initial = harness.status_rx.borrow().clone();
        assert_eq!(initial.phase, PhaseKind::Counting);
        assert_eq!(initial.display.text, "00:00:05");
        assert!(initial.deadline.is_some());
    }

    let blinking = harness.wait_for_phase(PhaseKind::Blinking).await;
    assert_eq!(t0.elapsed(), Duration::from_secs(5));
    assert_eq!(blinking.display.text, "00:00:00");
    assert_eq!(blinking.display.color, ALARM);

    let idle = harness.wait_for_phase(PhaseKind::Idle).await;
    // 5s countdown plus 10 blink toggles of 200ms
    assert_eq!(t0.elapsed(), Duration::from_secs(7));
    assert_eq!(idle.display.text, "00:00:00");
    assert_eq!(idle.display.color, NEUTRAL);
    assert_eq!(idle.remaining_seconds, None);
}

#[tokio::test(start_paused = true)]
async fn countdown_display_turns_red_toward_zero() {
    let mut harness = Harness::new();
    harness.start(25, false).await.unwrap();

    let at_threshold = harness
        .status_rx
        .wait_for(|s| s.remaining_seconds == Some(20))
        .await
        .unwrap()
        .clone();
    assert_eq!(at_threshold.display.color, NEUTRAL);

    let near_zero = harness
        .status_rx
        .wait_for(|s| s.remaining_seconds == Some(1))
        .await
        .unwrap()
        .clone();
    assert!(near_zero.display.color.r > 200);
    assert_eq!(near_zero.display.color.g, 0);

    let blinking = harness.wait_for_phase(PhaseKind::Blinking).await;
    assert_eq!(blinking.display.color, ALARM);
}

#[tokio::test(start_paused = true)]
async fn zero_duration_start_is_rejected_without_side_effects() {
    let harness = Harness::new();

    let result = harness.start(0, true).await;
    assert_eq!(result, Err(ControllerError::ZeroDuration));
    assert!(harness.scheduler.calls().is_empty());

    let status = harness.status_rx.borrow().clone();
    assert_eq!(status.phase, PhaseKind::Idle);
    assert_eq!(status.display, DisplayState::default());
}

#[tokio::test(start_paused = true)]
async fn start_while_running_is_rejected() {
    let harness = Harness::new();

    harness.start(30, true).await.unwrap();
    let result = harness.start(10, true).await;
    assert_eq!(result, Err(ControllerError::AlreadyRunning));
    // Only the first start reached the scheduler.
    assert_eq!(harness.scheduler.calls(), vec![SchedulerCall::Schedule(30)]);
}

#[tokio::test(start_paused = true)]
async fn stop_mid_countdown_cancels_and_resets() {
    let mut harness = Harness::new();
    harness.selection.lock().unwrap().minutes = 5;

    harness.start(30, true).await.unwrap();
    harness
        .status_rx
        .wait_for(|s| s.remaining_seconds == Some(28))
        .await
        .unwrap();

    harness.stop().await;
    assert_eq!(
        harness.scheduler.calls(),
        vec![SchedulerCall::Schedule(30), SchedulerCall::Cancel]
    );

    let status = harness.status_rx.borrow_and_update().clone();
    assert_eq!(status.phase, PhaseKind::Idle);
    assert_eq!(status.display.text, "00:00:00");
    assert_eq!(status.display.color, NEUTRAL);
    assert_eq!(harness.selection.lock().unwrap().total_seconds(), 0);

    // The engine is gone: no tick may surface after the stop resolved.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!harness.status_rx.has_changed().unwrap());

    // A fresh countdown starts cleanly afterwards.
    harness.start(10, true).await.unwrap();
    let status = harness.wait_for_phase(PhaseKind::Counting).await;
    assert_eq!(status.remaining_seconds, Some(10));
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_from_idle() {
    let harness = Harness::new();

    harness.stop().await;
    assert_eq!(harness.scheduler.calls(), vec![SchedulerCall::Cancel]);
    assert_eq!(harness.status_rx.borrow().phase, PhaseKind::Idle);

    harness.stop().await;
    assert_eq!(
        harness.scheduler.calls(),
        vec![SchedulerCall::Cancel, SchedulerCall::Cancel]
    );
}

#[tokio::test(start_paused = true)]
async fn display_only_run_never_schedules() {
    let mut harness = Harness::new();

    harness.start(3, false).await.unwrap();
    harness.wait_for_phase(PhaseKind::Blinking).await;
    assert!(harness.scheduler.calls().is_empty());

    // Cancel on stop is still unconditional.
    harness.stop().await;
    assert_eq!(harness.scheduler.calls(), vec![SchedulerCall::Cancel]);
}

#[tokio::test(start_paused = true)]
async fn blink_alert_toggles_ten_times_then_idles() {
    let mut harness = Harness::new();

    harness.start(1, false).await.unwrap();
    harness.wait_for_phase(PhaseKind::Blinking).await;
    let entry = tokio::time::Instant::now();

    let mut blink_updates = 0;
    let mut saw_neutral = false;
    loop {
        harness.status_rx.changed().await.unwrap();
        let status = harness.status_rx.borrow_and_update().clone();
        match status.phase {
            PhaseKind::Blinking => {
                blink_updates += 1;
                saw_neutral |= status.display.color == NEUTRAL;
                assert_eq!(status.display.text, "00:00:00");
            }
            PhaseKind::Idle => break,
            PhaseKind::Counting => panic!("countdown restarted unexpectedly"),
        }
    }

    // Entry state plus 9 intermediate toggles; the 10th toggle goes idle.
    assert_eq!(blink_updates, 9);
    assert!(saw_neutral);
    assert_eq!(entry.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn stop_ack_waits_for_the_cancel_command() {
    use std::sync::atomic::{AtomicBool, Ordering};

    // Scheduler whose cancel command takes a while to run, like a slow
    // `shutdown -c` process.
    struct SlowCancelScheduler {
        cancel_ran: Arc<AtomicBool>,
    }

    impl ShutdownScheduler for SlowCancelScheduler {
        fn schedule(&self, _delay_seconds: u64) {}

        fn cancel(&self) -> tokio::task::JoinHandle<()> {
            let cancel_ran = Arc::clone(&self.cancel_ran);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel_ran.store(true, Ordering::Relaxed);
            })
        }
    }

    let cancel_ran = Arc::new(AtomicBool::new(false));
    let scheduler = Arc::new(SlowCancelScheduler {
        cancel_ran: Arc::clone(&cancel_ran),
    });
    let selection = Arc::new(Mutex::new(DurationSelection::default()));
    let (cmd_tx, _status_rx, _handle) = controller::spawn(scheduler, selection);

    let (reply, rx) = oneshot::channel();
    cmd_tx.send(Command::Stop { reply }).await.unwrap();
    rx.await.unwrap();

    // The ack only arrives once the cancel command has finished running.
    assert!(cancel_ran.load(Ordering::Relaxed));
}

#[tokio::test(start_paused = true)]
async fn stop_during_blink_resets_immediately() {
    let mut harness = Harness::new();

    harness.start(1, false).await.unwrap();
    harness.wait_for_phase(PhaseKind::Blinking).await;

    harness.stop().await;
    let status = harness.status_rx.borrow_and_update().clone();
    assert_eq!(status.phase, PhaseKind::Idle);
    assert_eq!(status.display.color, NEUTRAL);

    // No leftover blink toggles fire after the reset.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!harness.status_rx.has_changed().unwrap());
}
