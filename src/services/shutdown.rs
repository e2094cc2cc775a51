//! External OS shutdown scheduling

use tokio::{process::Command, task::JoinHandle};
use tracing::{info, warn};

/// Fire-and-forget interface to the platform shutdown command.
///
/// Neither call reports success or failure back to the caller; the countdown
/// display is not tied to whether the OS actually honored the request.
pub trait ShutdownScheduler: Send + Sync {
    /// Schedule a shutdown `delay_seconds` from now.
    fn schedule(&self, delay_seconds: u64);

    /// Cancel a previously scheduled shutdown, if any. Returns the handle of
    /// the spawned command so stop can wait for it to have run before acking;
    /// the command's outcome is still not reported.
    fn cancel(&self) -> JoinHandle<()>;
}

/// Scheduler backed by the platform `shutdown` command.
pub struct SystemShutdown;

impl ShutdownScheduler for SystemShutdown {
    fn schedule(&self, delay_seconds: u64) {
        tokio::spawn(run_shutdown_command(schedule_args(delay_seconds)));
    }

    fn cancel(&self) -> JoinHandle<()> {
        tokio::spawn(run_shutdown_command(cancel_args()))
    }
}

#[cfg(windows)]
fn schedule_args(delay_seconds: u64) -> Vec<String> {
    vec!["/s".into(), "/t".into(), delay_seconds.to_string()]
}

#[cfg(windows)]
fn cancel_args() -> Vec<String> {
    vec!["/a".into()]
}

#[cfg(not(windows))]
fn schedule_args(delay_seconds: u64) -> Vec<String> {
    // shutdown(8) takes whole minutes; round up so the OS never halts
    // before the countdown display reaches zero.
    let minutes = delay_seconds.div_ceil(60);
    vec!["-h".into(), format!("+{}", minutes)]
}

#[cfg(not(windows))]
fn cancel_args() -> Vec<String> {
    vec!["-c".into()]
}

async fn run_shutdown_command(args: Vec<String>) {
    info!("Running shutdown {}", args.join(" "));

    match Command::new("shutdown").args(&args).output().await {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("shutdown command failed: {}", stderr.trim());
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to execute shutdown command: {}", e),
    }
}
