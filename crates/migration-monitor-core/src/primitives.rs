//! # Primitives
//!
//! Fixed phase names, report tags and input limits for the monitor.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Adapters reference them; the generic engine never does.

// =============================================================================
// MIGRATION PHASES
// =============================================================================

/// Phase of a resource whose execution failed.
pub const PHASE_FAILED: &str = "Failed";

/// Phase of a resource whose execution completed.
pub const PHASE_SUCCEEDED: &str = "Succeeded";

/// Well-known phases of a single VM migration, in lifecycle order.
///
/// `Failed` may be entered from any non-terminal phase.
pub const MIGRATION_PHASES: [&str; 11] = [
    "Pending",
    "Validating",
    "AwaitingDataCopyStart",
    "CopyingBlocks",
    "CopyingChangedBlocks",
    "ConvertingDisk",
    "AwaitingCutOverStartTime",
    "AwaitingAdminCutOver",
    PHASE_SUCCEEDED,
    PHASE_FAILED,
    "Unknown",
];

/// Check if `phase` is one of the well-known migration phases.
#[must_use]
pub fn is_known_migration_phase(phase: &str) -> bool {
    MIGRATION_PHASES.contains(&phase)
}

// =============================================================================
// FAILURE DESCRIPTIONS
// =============================================================================

/// Reason used when no status condition provides one.
pub const DEFAULT_FAILURE_REASON: &str = "Unknown";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of resources accepted in a single collection.
///
/// Collections longer than this are rejected by the decoding helpers
/// before they reach an observer.
pub const MAX_SNAPSHOT_RESOURCES: usize = 10_000;

/// Default number of events retained by in-memory sinks.
pub const DEFAULT_RETAINED_EVENTS: usize = 256;
