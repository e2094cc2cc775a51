//! Countdown engine background task

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval, Instant},
};
use tracing::debug;

/// Handle to a running countdown engine.
///
/// The engine ticks at 1 Hz, recomputing the remaining time from the captured
/// start instant each tick so the countdown cannot drift, and emits each value
/// on the tick channel. The first emission happens immediately and carries the
/// full duration; after emitting a single `0` the task exits on its own.
#[derive(Debug)]
pub struct EngineHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl EngineHandle {
    /// Spawn an engine counting down from `total_seconds`.
    pub fn spawn(total_seconds: u64, tick_tx: mpsc::Sender<u64>) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(countdown_task(total_seconds, tick_tx, stop_rx));
        Self { stop_tx, join }
    }

    /// Signal the engine to stop and wait until the task has fully exited,
    /// so no tick can arrive after this returns. Teardown errors are
    /// suppressed; stopping an already-finished engine is fine.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }
}

async fn countdown_task(
    total_seconds: u64,
    tick_tx: mpsc::Sender<u64>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let started = Instant::now();
    let mut ticker = interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let remaining = total_seconds.saturating_sub(started.elapsed().as_secs());
                if tick_tx.send(remaining).await.is_err() {
                    debug!("Tick receiver dropped, countdown engine exiting");
                    break;
                }
                if remaining == 0 {
                    break;
                }
            }
            _ = stop_rx.changed() => {
                debug!("Countdown engine stopped with {}s elapsed", started.elapsed().as_secs());
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_non_increasing_sequence_ending_in_one_zero() {
        let (tick_tx, mut tick_rx) = mpsc::channel(16);
        let started = Instant::now();
        let engine = EngineHandle::spawn(5, tick_tx);

        let mut seen = Vec::new();
        while let Some(remaining) = tick_rx.recv().await {
            seen.push(remaining);
        }

        assert_eq!(seen, vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        // The task already exited after the final zero; stop just reaps it.
        engine.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_emission_promptly() {
        let (tick_tx, mut tick_rx) = mpsc::channel(16);
        let engine = EngineHandle::spawn(30, tick_tx);

        assert_eq!(tick_rx.recv().await, Some(30));
        tokio::time::sleep(Duration::from_secs(2)).await;
        engine.stop().await;

        // Anything still buffered predates the stop; the channel must then
        // close without ever reaching zero.
        let mut last = 30;
        while let Some(remaining) = tick_rx.recv().await {
            assert!(remaining <= last);
            assert!(remaining > 0);
            last = remaining;
        }
    }
}
