//! # migration-monitor-core
//!
//! The phase transition engine for the migration monitor - THE ENGINE.
//!
//! Long-running migrations are driven by controllers outside this process.
//! A watcher delivers their full collection on every refresh tick; this
//! crate remembers each resource's last phase and reports every transition
//! into a terminal failure exactly once.
//!
//! ## Layers
//!
//! - `store` / `cleanup`: per-resource transition memory and its pruning
//! - `observer`: the generic engine, parameterized by a `PhasePolicy`
//! - `adapters`: policies for single migrations and rolling plans
//! - `monitor`: both observers behind one pair of sinks
//!
//! ## Architectural Constraints
//!
//! - No async, no network: refreshes are synchronous and run to completion
//! - Sinks are opaque: a failing sink never blocks bookkeeping
//! - Deterministic: `BTreeMap`/`BTreeSet` only
//! - No persisted state: baselines are rebuilt from first sightings

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod cleanup;
pub mod conditions;
pub mod monitor;
pub mod observer;
pub mod primitives;
pub mod resources;
pub mod sink;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    FailureDescription, LogRecord, MonitorError, Phase, PhaseTransition, ReportEvent, ResourceId,
    TerminalClass, TerminalPhase, TransitionRecord,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use cleanup::prune;
pub use observer::{Metadata, PhaseObserver, PhasePolicy, RefreshSummary};
pub use store::TransitionStore;

// =============================================================================
// RE-EXPORTS: Sinks
// =============================================================================

pub use sink::{
    LogSink, MemoryLogSink, MemoryReportSink, NullSink, ReportSink, SinkError, TracingLogSink,
};

// =============================================================================
// RE-EXPORTS: Domain
// =============================================================================

pub use adapters::{
    MigrationPolicy, MigrationStatusMonitor, RollingMigrationsStatusMonitor, RollingPlanPolicy,
};
pub use conditions::{Condition, latest_condition};
pub use monitor::{MonitorSummary, Snapshot, StatusMonitor, snapshot_from_json, snapshots_from_json};
pub use resources::{Migration, ObjectMeta, RollingMigrationPlan};
