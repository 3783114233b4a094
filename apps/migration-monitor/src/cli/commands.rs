//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use migration_monitor::api::{self, AppState};
use migration_monitor::config::MonitorConfig;
use migration_monitor::sinks::ReportLog;
use migration_monitor::watcher::SnapshotWatcher;
use migration_monitor::{AppMonitor, share, shutdown_signal};
use migration_monitor_core::{MonitorError, MonitorSummary, TracingLogSink, snapshots_from_json};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Maximum file size for replay (256 MB).
const MAX_REPLAY_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Resolve `path` to an existing regular file no larger than `max_size`.
fn validate_input_file(path: &Path, max_size: u64) -> Result<PathBuf, MonitorError> {
    let canonical = path.canonicalize().map_err(|e| {
        MonitorError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    let metadata = std::fs::metadata(&canonical)
        .map_err(|e| MonitorError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if !metadata.is_file() {
        return Err(MonitorError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > max_size {
        return Err(MonitorError::InvalidSnapshot(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(canonical)
}

/// Build a monitor wired to the configured report log.
fn build_monitor(config: &MonitorConfig) -> Result<AppMonitor, MonitorError> {
    let reporter = ReportLog::open(config.report.output.as_deref(), config.report.retained)?;
    Ok(AppMonitor::new(reporter, TracingLogSink))
}

// =============================================================================
// REPLAY COMMAND
// =============================================================================

/// Feed every snapshot of a file through a fresh monitor.
pub fn cmd_replay(config: &MonitorConfig, file: &Path, json_mode: bool) -> Result<(), MonitorError> {
    let path = validate_input_file(file, MAX_REPLAY_FILE_SIZE)?;
    let contents = std::fs::read(&path)
        .map_err(|e| MonitorError::IoError(format!("Read file: {}", e)))?;
    let snapshots = snapshots_from_json(&contents)?;

    tracing::info!("Replaying {} snapshots from {:?}", snapshots.len(), path);

    let mut monitor = build_monitor(config)?;
    let mut total = MonitorSummary::default();
    for snapshot in &snapshots {
        total.absorb(&monitor.refresh(snapshot));
    }

    if json_mode {
        let output = serde_json::json!({
            "file": path.to_string_lossy(),
            "snapshots": snapshots.len(),
            "migrations": total.migrations,
            "rolling_migration_plans": total.rolling_migration_plans,
            "failures_reported": total.failures_reported(),
            "report_log": monitor.reporter().path().map(|p| p.to_string_lossy().into_owned()),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Replay Summary");
    println!("==============");
    println!("File:      {:?}", path);
    println!("Snapshots: {}", snapshots.len());
    println!();
    println!("Migrations:");
    println!("  Tracked:            {}", total.migrations.tracked);
    println!("  Transitions:        {}", total.migrations.transitions);
    println!("  Failures reported:  {}", total.migrations.failures_reported);
    println!("  Successes recorded: {}", total.migrations.successes_recorded);
    println!("Rolling Migration Plans:");
    println!("  Tracked:            {}", total.rolling_migration_plans.tracked);
    println!("  Transitions:        {}", total.rolling_migration_plans.transitions);
    println!(
        "  Failures reported:  {}",
        total.rolling_migration_plans.failures_reported
    );
    println!(
        "  Successes recorded: {}",
        total.rolling_migration_plans.successes_recorded
    );

    for entry in monitor.reporter().recent(total.failures_reported()) {
        println!();
        println!("[{}] {}", entry.reported_at, entry.event.title);
    }

    Ok(())
}

// =============================================================================
// WATCH COMMAND
// =============================================================================

/// Poll a snapshot file until Ctrl+C.
pub async fn cmd_watch(
    mut config: MonitorConfig,
    file: &Path,
    interval: Option<u64>,
) -> Result<(), MonitorError> {
    if let Some(secs) = interval {
        config.watch.interval_secs = secs;
    }
    let watcher = SnapshotWatcher::new(file, config.watch.interval_secs);
    let monitor = share(build_monitor(&config)?);

    println!("Watching {:?} (Ctrl+C to stop)", watcher.path());

    let ticks = watcher.run(monitor.clone(), shutdown_signal()).await;
    let reports = monitor.lock().await.reporter().total();
    tracing::info!("Watcher stopped after {} ticks, {} reports", ticks, reports);
    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server, optionally with a background watcher.
pub async fn cmd_serve(
    mut config: MonitorConfig,
    host: Option<String>,
    port: Option<u16>,
    watch: Option<PathBuf>,
) -> Result<(), MonitorError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let monitor = share(build_monitor(&config)?);

    println!("Migration Monitor Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Rate limit: {}", config.server.rate_limit);
    match config.report.output.as_deref() {
        Some(path) => println!("  Report log: {:?}", path),
        None => println!("  Report log: (memory only)"),
    }
    println!();
    println!("Endpoints:");
    println!("  POST /refresh                          - Refresh from a snapshot");
    println!("  POST /refresh/migrations               - Refresh migrations");
    println!("  POST /refresh/rolling-migration-plans  - Refresh rolling plans");
    println!("  GET  /status                           - Monitor status");
    println!("  GET  /reports                          - Recent failure reports");
    println!("  GET  /health                           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    if let Some(file) = watch {
        let watcher = SnapshotWatcher::new(file, config.watch.interval_secs);
        let shared = monitor.clone();
        tokio::spawn(async move {
            watcher.run(shared, shutdown_signal()).await;
        });
    }

    api::run_server(&config.server, AppState::new(monitor), shutdown_signal()).await
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective configuration.
pub fn cmd_config(config: &MonitorConfig, json_mode: bool) -> Result<(), MonitorError> {
    if json_mode {
        let output = serde_json::to_string_pretty(config)
            .map_err(|e| MonitorError::SerializationError(e.to_string()))?;
        println!("{}", output);
    } else {
        print!("{}", config.to_toml_string()?);
    }
    Ok(())
}
