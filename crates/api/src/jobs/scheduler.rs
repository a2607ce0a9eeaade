//! Interval-driven background job runner.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// How often a job fires.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)] // Hourly is available for future jobs
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
    Hourly,
    Daily,
}

impl JobFrequency {
    pub fn duration(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(mins * 60),
            JobFrequency::Hourly => Duration::from_secs(60 * 60),
            JobFrequency::Daily => Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// A unit of recurring background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Stable name used in log lines.
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    /// Runs one iteration. An `Err` is logged and the schedule continues.
    async fn execute(&self) -> Result<(), String>;
}

/// Owns one tokio task per registered job and a shared shutdown signal.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawns one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let shutdown = self.shutdown_rx.clone();
            self.handles.push(tokio::spawn(drive(job, shutdown)));
        }
    }

    /// Signals all job tasks to stop. Returns without waiting.
    pub fn shutdown(&self) {
        info!("Stopping job scheduler");
        let _ = self.shutdown_tx.send(true);
    }

    /// Waits for job tasks to finish, up to `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(?timeout, "Job shutdown timed out");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn drive(job: Arc<dyn Job>, mut shutdown: watch::Receiver<bool>) {
    let name = job.name();
    let mut interval = tokio::time::interval(job.frequency().duration());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately; consume it so the job waits a
    // full period before its first run.
    interval.tick().await;

    info!(job = name, frequency = ?job.frequency(), "Job scheduled");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let started = std::time::Instant::now();
                match job.execute().await {
                    Ok(()) => info!(
                        job = name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Job completed"
                    ),
                    Err(e) => error!(
                        job = name,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %e,
                        "Job failed"
                    ),
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!(job = name, "Job stopping");
                    break;
                }
            }
        }
    }
}
