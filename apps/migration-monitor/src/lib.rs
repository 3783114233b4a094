//! # migration-monitor
//!
//! Async surfaces around `migration-monitor-core`: HTTP API, snapshot file
//! watcher, configuration and the file-backed report sink.
//!
//! The engine itself is synchronous. Every surface shares one
//! [`SharedMonitor`], so refreshes are serialized.

pub mod api;
pub mod config;
pub mod sinks;
pub mod watcher;

use migration_monitor_core::{StatusMonitor, TracingLogSink};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The monitor wired to the production sinks.
pub type AppMonitor = StatusMonitor<sinks::ReportLog, TracingLogSink>;

/// Monitor shared between the HTTP API and the watcher.
pub type SharedMonitor = Arc<Mutex<AppMonitor>>;

/// Wrap a monitor for sharing.
#[must_use]
pub fn share(monitor: AppMonitor) -> SharedMonitor {
    Arc::new(Mutex::new(monitor))
}

/// Resolve when the process receives Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
