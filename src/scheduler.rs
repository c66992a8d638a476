//! Hourly cycle scheduling.
//!
//! One background task polls every minute while the running flag is set
//! and fires a cycle when the hourly deadline has passed. Stopping is
//! cooperative: the flag clears, the task wakes (via the shutdown signal
//! or its next poll) and exits. An in-flight cycle is never interrupted
//! mid-fetch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, sleep};
use tracing::{info, warn};

use crate::config::ScheduleConfig;
use crate::cycle::Orchestrator;

/// Drives [`Orchestrator::run_cycle`] on a fixed interval.
///
/// The running flag and the task handle are the only shared mutable
/// state in the process; start and stop are mutually exclusive user
/// actions and both check the flag before acting.
pub struct Scheduler {
    orchestrator: Arc<Orchestrator>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
    send_interval: Duration,
    poll_interval: Duration,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<Orchestrator>, config: &ScheduleConfig) -> Self {
        Self {
            orchestrator,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            handle: None,
            send_interval: config.send_interval,
            poll_interval: config.poll_interval,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the background polling task. No-op when already running.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Scheduler is already running");
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        let orchestrator = Arc::clone(&self.orchestrator);
        let running = Arc::clone(&self.running);
        let shutdown = Arc::clone(&self.shutdown);
        let send_interval = self.send_interval;
        let poll_interval = self.poll_interval;

        self.handle = Some(tokio::spawn(async move {
            let mut next_run = Instant::now() + send_interval;
            while running.load(Ordering::SeqCst) {
                tokio::select! {
                    _ = sleep(poll_interval) => {
                        if Instant::now() >= next_run {
                            orchestrator.run_cycle().await;
                            next_run = Instant::now() + send_interval;
                        }
                    }
                    _ = shutdown.notified() => break,
                }
            }
            info!("Scheduler task exited");
        }));

        info!(
            interval_secs = self.send_interval.as_secs(),
            "Scheduler started; first dispatch after one interval"
        );
    }

    /// Clear the flag, wake the task, and wait for it to exit. No-op
    /// when not running.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            warn!("Scheduler is not running");
            return;
        }
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("Scheduler stopped");
    }

    /// Run a single cycle inline, outside the schedule.
    pub async fn run_once(&self) {
        self.orchestrator.run_cycle().await;
    }
}
