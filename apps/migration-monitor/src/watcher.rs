//! # Snapshot Watcher
//!
//! Polls a snapshot file on a fixed interval and feeds each decoded
//! snapshot to the monitor as one refresh.
//!
//! A tick that cannot read or decode the file is logged and skipped; the
//! monitor keeps its last good baseline. Ticks never overlap: a slow
//! refresh delays the next tick instead of queuing more.

use migration_monitor_core::{
    LogSink, MonitorError, MonitorSummary, ReportSink, StatusMonitor, snapshot_from_json,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

/// Maximum snapshot file size (64 MB).
pub const MAX_SNAPSHOT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Periodic reader of one snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotWatcher {
    path: PathBuf,
    interval: Duration,
}

impl SnapshotWatcher {
    /// Create a watcher. A zero interval is raised to one second.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, interval_secs: u64) -> Self {
        Self {
            path: path.into(),
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    /// The watched file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time between ticks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Read the file once and refresh the monitor with it.
    pub async fn tick<R, L>(
        &self,
        monitor: &Mutex<StatusMonitor<R, L>>,
    ) -> Result<MonitorSummary, MonitorError>
    where
        R: ReportSink,
        L: LogSink,
    {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            MonitorError::IoError(format!("Cannot stat '{}': {}", self.path.display(), e))
        })?;
        if metadata.len() > MAX_SNAPSHOT_FILE_SIZE {
            return Err(MonitorError::InvalidSnapshot(format!(
                "File size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_SNAPSHOT_FILE_SIZE
            )));
        }

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            MonitorError::IoError(format!("Cannot read '{}': {}", self.path.display(), e))
        })?;
        let snapshot = snapshot_from_json(&bytes)?;

        let mut monitor = monitor.lock().await;
        Ok(monitor.refresh(&snapshot))
    }

    /// Tick until `shutdown` resolves.
    ///
    /// Returns the number of successful ticks.
    pub async fn run<R, L, S>(&self, monitor: Arc<Mutex<StatusMonitor<R, L>>>, shutdown: S) -> u64
    where
        R: ReportSink,
        L: LogSink,
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            "Watching {} every {}s",
            self.path.display(),
            self.interval.as_secs()
        );

        let mut completed: u64 = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    match self.tick(&monitor).await {
                        Ok(summary) => {
                            completed = completed.saturating_add(1);
                            tracing::info!(
                                migrations = summary.migrations.resources,
                                rolling_migration_plans = summary.rolling_migration_plans.resources,
                                failures_reported = summary.failures_reported(),
                                "refresh complete"
                            );
                        }
                        Err(e) => tracing::warn!("Skipping tick: {}", e),
                    }
                }
            }
        }
        completed
    }
}
