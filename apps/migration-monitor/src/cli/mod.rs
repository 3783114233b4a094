//! # Migration Monitor CLI Module
//!
//! This module implements the CLI interface for the migration monitor.
//!
//! ## Available Commands
//!
//! - `replay` - Feed recorded snapshots through a fresh monitor
//! - `watch` - Poll a snapshot file and report failures as they happen
//! - `serve` - Start the HTTP server
//! - `config` - Print the effective configuration

mod commands;

use clap::{Parser, Subcommand};
use migration_monitor::config::MonitorConfig;
use migration_monitor_core::MonitorError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Migration Status Monitor
///
/// Tracks the phase of every migration and rolling migration plan and
/// reports each transition into a failed phase exactly once.
#[derive(Parser, Debug)]
#[command(name = "migration-monitor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay recorded snapshots (JSON array or a stream of snapshot objects)
    Replay {
        /// Path to the snapshot file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Watch a snapshot file and refresh on every tick
    Watch {
        /// Path to the snapshot file
        #[arg(short, long)]
        file: PathBuf,

        /// Seconds between ticks (overrides [watch] interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides [server] host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Also poll this snapshot file in the background
        #[arg(short, long)]
        watch: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MonitorError> {
    let config = MonitorConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Replay { file }) => cmd_replay(&config, &file, json_mode),
        Some(Commands::Watch { file, interval }) => cmd_watch(config, &file, interval).await,
        Some(Commands::Serve { host, port, watch }) => cmd_serve(config, host, port, watch).await,
        Some(Commands::Config) | None => cmd_config(&config, json_mode),
    }
}
