//! # Core Type Definitions
//!
//! This module contains all core types shared by the transition engine:
//! - Resource identity and lifecycle values (`ResourceId`, `Phase`)
//! - Per-resource memory (`TransitionRecord`)
//! - Terminal phase classification (`TerminalClass`, `TerminalPhase`)
//! - Sink payloads (`FailureDescription`, `ReportEvent`, `LogRecord`)
//! - Error types (`MonitorError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` where they key a collection, for `BTreeMap`/`BTreeSet`
//! - Carry metadata in `BTreeMap` so serialized events have a stable field order

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// RESOURCE IDENTITY
// =============================================================================

/// Identifier of a watched resource.
///
/// Unique within one collection and stable across refreshes. For
/// cluster-native objects this is `metadata.name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Create a new resource identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// A lifecycle phase value as reported by the resource's status.
///
/// An observed phase is always carried as `Option<Phase>`: `None` means the
/// resource has not reported a phase yet, which is a valid observation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phase(pub String);

impl Phase {
    /// Create a new phase value.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the phase as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label for an observed phase, `"Unknown"` when none was reported.
    #[must_use]
    pub fn label(phase: Option<&Phase>) -> &str {
        phase.map_or("Unknown", Phase::as_str)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Phase {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// TERMINAL PHASES
// =============================================================================

/// Whether reaching a terminal phase is a failure or a success.
///
/// Failure-class phases build a description and reach the sinks.
/// Success-class phases are only recorded as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalClass {
    Failure,
    Success,
}

/// A named terminal phase an adapter is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalPhase {
    /// The phase value, compared verbatim against the observed phase.
    pub phase: &'static str,
    /// How reaching this phase is handled.
    pub class: TerminalClass,
}

impl TerminalPhase {
    /// A failure-class terminal phase.
    #[must_use]
    pub const fn failure(phase: &'static str) -> Self {
        Self {
            phase,
            class: TerminalClass::Failure,
        }
    }

    /// A success-class terminal phase.
    #[must_use]
    pub const fn success(phase: &'static str) -> Self {
        Self {
            phase,
            class: TerminalClass::Success,
        }
    }

    /// Check if an observed phase is this terminal phase.
    #[must_use]
    pub fn matches(&self, observed: Option<&Phase>) -> bool {
        observed.is_some_and(|p| p.as_str() == self.phase)
    }
}

// =============================================================================
// TRANSITION RECORD
// =============================================================================

/// Per-resource transition memory.
///
/// - `previous_phase` is the phase observed on the prior refresh
/// - `last_reported_phase` is the terminal phase already handled, if any;
///   it is overwritten by the next terminal transition and otherwise only
///   disappears together with the record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub previous_phase: Option<Phase>,
    pub last_reported_phase: Option<Phase>,
}

impl TransitionRecord {
    /// Create the baseline record for a first sighting.
    #[must_use]
    pub fn baseline(phase: Option<Phase>) -> Self {
        Self {
            previous_phase: phase,
            last_reported_phase: None,
        }
    }

    /// Check if an observed phase carries no reportable change.
    ///
    /// True when the phase equals the previous one, or equals the phase that
    /// was already reported.
    #[must_use]
    pub fn is_unchanged(&self, current: Option<&Phase>) -> bool {
        self.previous_phase.as_ref() == current || self.last_reported_phase.as_ref() == current
    }
}

// =============================================================================
// SINK PAYLOADS
// =============================================================================

/// Human-readable description of a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDescription {
    pub message: String,
    pub reason: String,
    /// Timestamp of the status condition the message came from.
    pub timestamp: Option<String>,
}

/// A phase change of a tracked resource, as seen by one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    pub id: ResourceId,
    pub previous: Option<Phase>,
    pub current: Option<Phase>,
}

/// Structured failure event handed to the report sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Error title, e.g. `"Migration execution failed: disk copy timed out"`.
    pub title: String,
    /// Stable context tag used to group events in the reporting backend.
    pub context: String,
    /// Name of the monitor that produced the event.
    pub component: String,
    pub metadata: BTreeMap<String, JsonValue>,
}

/// Plain structured record handed to the log sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub message: String,
    pub resource: ResourceId,
    pub fields: BTreeMap<String, JsonValue>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur around the monitor.
///
/// The refresh pass itself never fails; these cover decoding input
/// collections and the surfaces built on top of the engine.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A snapshot or resource collection could not be decoded.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A snapshot carried more resources than allowed.
    #[error("Snapshot too large: {count} resources exceeds maximum {max}")]
    SnapshotTooLarge { count: usize, max: usize },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
