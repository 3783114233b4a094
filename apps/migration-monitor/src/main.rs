//! # Migration Monitor
//!
//! The main binary for the migration status monitor.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) fed by a cluster watcher
//! - Snapshot file watcher
//! - CLI interface for replaying recorded snapshots
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                apps/migration-monitor (THE BINARY)              │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   HTTP API  │    │  Snapshot Watcher│    │
//! │  │  (clap)     │    │   (axum)    │    │  (tokio interval)│    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                ┌────────────────────────┐                      │
//! │                │ migration-monitor-core │                      │
//! │                │      (THE ENGINE)      │                      │
//! │                └────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! migration-monitor serve --host 0.0.0.0 --port 8080
//!
//! # Poll a snapshot file written by an external watcher
//! migration-monitor watch -f snapshot.json --interval 10
//!
//! # Replay recorded snapshots
//! migration-monitor replay -f snapshots.jsonl --json-mode
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. MIGRATION_MONITOR_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("MIGRATION_MONITOR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "migration_monitor=debug,migration_monitor_core=debug,tower_http=debug"
    } else {
        "migration_monitor=info,migration_monitor_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Migration Status Monitor v{}

  Every failed migration, reported exactly once.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
