//! # Phase Transition Observer
//!
//! The generic engine. Each refresh delivers the full resource collection;
//! the observer compares every resource's phase with the one remembered from
//! the previous refresh and reports each transition into a failure-class
//! terminal phase exactly once.
//!
//! ## Refresh Pass
//!
//! 1. An empty collection is a no-op: nothing is pruned, nothing is scanned.
//! 2. Identifiers are resolved; resources without one are skipped.
//! 3. Records for identifiers missing from the collection are pruned.
//! 4. A first sighting only records the baseline phase.
//! 5. A phase equal to the previous one, or to the already reported one,
//!    is not a reportable transition.
//! 6. Each matching terminal phase not yet reported is handled:
//!    failures reach both sinks, successes are only marked.
//! 7. The observed phase becomes the previous phase.
//!
//! Sink errors are logged and swallowed; bookkeeping always completes.

use crate::cleanup;
use crate::sink::{LogSink, ReportSink};
use crate::store::TransitionStore;
use crate::{
    FailureDescription, LogRecord, Phase, PhaseTransition, ReportEvent, ResourceId, TerminalClass,
    TerminalPhase, TransitionRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Metadata attached to report events and log records.
pub type Metadata = BTreeMap<String, JsonValue>;

// =============================================================================
// POLICY
// =============================================================================

/// Domain policy plugged into the generic observer.
///
/// Implementations extract data only; all control flow lives in
/// [`PhaseObserver`]. Accessors must be total: missing nested data maps to
/// `None` or a placeholder, never a panic.
pub trait PhasePolicy {
    /// The watched resource type.
    type Resource;

    /// Resource kind used in synthesized messages, e.g. `"Migration"`.
    fn kind(&self) -> &'static str;

    /// Name of the monitor, attached to every report.
    fn component(&self) -> &'static str;

    /// Context tag of failure reports.
    fn failure_context(&self) -> &'static str;

    /// Leading text of report titles and log messages.
    fn failure_summary(&self) -> &'static str;

    /// Stable identifier of a resource, `None` if it cannot be tracked.
    fn identify(&self, resource: &Self::Resource) -> Option<ResourceId>;

    /// Currently reported phase of a resource.
    fn current_phase(&self, resource: &Self::Resource) -> Option<Phase>;

    /// Terminal phases of interest, each handled independently.
    fn terminal_phases(&self) -> &[TerminalPhase];

    /// Build the human-readable description of a failure.
    ///
    /// Only called when a failure-class terminal phase is reached.
    fn describe_failure(
        &self,
        resource: &Self::Resource,
        phase: Option<&Phase>,
    ) -> FailureDescription;

    /// Resource-specific report metadata.
    fn report_metadata(
        &self,
        resource: &Self::Resource,
        transition: &PhaseTransition,
        description: &FailureDescription,
    ) -> Metadata;

    /// Extra fields for the log record, typically the full resource.
    fn log_fields(&self, _resource: &Self::Resource) -> Metadata {
        Metadata::new()
    }
}

// =============================================================================
// REFRESH SUMMARY
// =============================================================================

/// Counters describing one or more refresh passes.
///
/// Informational only; the engine never acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// Resources delivered.
    pub resources: usize,
    /// Resources skipped for lack of an identifier.
    pub unidentified: usize,
    /// Resources seen for the first time.
    pub first_sightings: usize,
    /// Reportable phase changes detected.
    pub transitions: usize,
    /// Failure events accepted by the report sink.
    pub failures_reported: usize,
    /// Success-class terminal phases marked as reported.
    pub successes_recorded: usize,
    /// Records removed by cleanup.
    pub pruned: usize,
    /// Report or log deliveries that returned an error.
    pub sink_failures: usize,
    /// Records held after the pass.
    pub tracked: usize,
}

impl RefreshSummary {
    /// Fold another summary into this one.
    ///
    /// Counters add up; `tracked` takes the later value.
    pub fn absorb(&mut self, other: &RefreshSummary) {
        self.resources = self.resources.saturating_add(other.resources);
        self.unidentified = self.unidentified.saturating_add(other.unidentified);
        self.first_sightings = self.first_sightings.saturating_add(other.first_sightings);
        self.transitions = self.transitions.saturating_add(other.transitions);
        self.failures_reported = self.failures_reported.saturating_add(other.failures_reported);
        self.successes_recorded = self.successes_recorded.saturating_add(other.successes_recorded);
        self.pruned = self.pruned.saturating_add(other.pruned);
        self.sink_failures = self.sink_failures.saturating_add(other.sink_failures);
        self.tracked = other.tracked;
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Generic phase transition observer.
///
/// Owns its policy and its transition store. Two observers never share
/// memory.
#[derive(Debug, Clone, Default)]
pub struct PhaseObserver<P> {
    policy: P,
    store: TransitionStore,
}

impl<P: PhasePolicy> PhaseObserver<P> {
    /// Create an observer with an empty store.
    #[must_use]
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            store: TransitionStore::new(),
        }
    }

    /// The plugged-in policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Read-only view of the transition memory.
    #[must_use]
    pub fn store(&self) -> &TransitionStore {
        &self.store
    }

    /// Transition record of one resource.
    #[must_use]
    pub fn record(&self, id: &ResourceId) -> Option<&TransitionRecord> {
        self.store.get(id)
    }

    /// Number of tracked resources.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.store.len()
    }

    /// Forget all transition memory.
    ///
    /// Every resource is a first sighting again on the next refresh.
    pub fn reset(&mut self) {
        self.store = TransitionStore::new();
    }

    /// Run one refresh pass over the full collection.
    pub fn refresh<R, L>(
        &mut self,
        resources: &[P::Resource],
        reporter: &mut R,
        logger: &mut L,
    ) -> RefreshSummary
    where
        R: ReportSink + ?Sized,
        L: LogSink + ?Sized,
    {
        let mut summary = RefreshSummary {
            resources: resources.len(),
            ..RefreshSummary::default()
        };
        if resources.is_empty() {
            summary.tracked = self.store.len();
            return summary;
        }

        let resolved: Vec<(ResourceId, &P::Resource)> = resources
            .iter()
            .filter_map(|r| self.policy.identify(r).map(|id| (id, r)))
            .collect();
        summary.unidentified = resources.len() - resolved.len();

        let live: BTreeSet<ResourceId> = resolved.iter().map(|(id, _)| id.clone()).collect();
        summary.pruned = cleanup::prune(&mut self.store, &live);

        for (id, resource) in &resolved {
            self.observe(id, resource, reporter, logger, &mut summary);
        }

        summary.tracked = self.store.len();
        summary
    }

    fn observe<R, L>(
        &mut self,
        id: &ResourceId,
        resource: &P::Resource,
        reporter: &mut R,
        logger: &mut L,
        summary: &mut RefreshSummary,
    ) where
        R: ReportSink + ?Sized,
        L: LogSink + ?Sized,
    {
        let current = self.policy.current_phase(resource);

        if self
            .store
            .insert_if_absent(id, TransitionRecord::baseline(current.clone()))
        {
            summary.first_sightings += 1;
            tracing::debug!(
                component = self.policy.component(),
                kind = self.policy.kind(),
                resource = %id,
                phase = Phase::label(current.as_ref()),
                "tracking new resource"
            );
            return;
        }

        let Some(record) = self.store.get(id).cloned() else {
            return;
        };

        if !record.is_unchanged(current.as_ref()) {
            summary.transitions += 1;
            let transition = PhaseTransition {
                id: id.clone(),
                previous: record.previous_phase.clone(),
                current: current.clone(),
            };
            let last_reported = self.handle_terminal(
                resource,
                &transition,
                record.last_reported_phase,
                reporter,
                logger,
                summary,
            );
            self.store.upsert(id, |r| TransitionRecord {
                last_reported_phase: last_reported,
                ..r
            });
        }

        self.store.upsert(id, |r| TransitionRecord {
            previous_phase: current,
            ..r
        });
    }

    /// Handle every terminal phase matching the transition.
    ///
    /// Returns the new `last_reported_phase`.
    fn handle_terminal<R, L>(
        &self,
        resource: &P::Resource,
        transition: &PhaseTransition,
        mut last_reported: Option<Phase>,
        reporter: &mut R,
        logger: &mut L,
        summary: &mut RefreshSummary,
    ) -> Option<Phase>
    where
        R: ReportSink + ?Sized,
        L: LogSink + ?Sized,
    {
        let current = transition.current.as_ref();
        for terminal in self.policy.terminal_phases() {
            if !terminal.matches(current) || last_reported.as_ref() == current {
                continue;
            }
            match terminal.class {
                TerminalClass::Failure => {
                    self.emit_failure(resource, transition, reporter, logger, summary);
                }
                TerminalClass::Success => {
                    summary.successes_recorded += 1;
                    tracing::debug!(
                        component = self.policy.component(),
                        resource = %transition.id,
                        phase = terminal.phase,
                        "terminal success recorded"
                    );
                }
            }
            last_reported = transition.current.clone();
        }
        last_reported
    }

    fn emit_failure<R, L>(
        &self,
        resource: &P::Resource,
        transition: &PhaseTransition,
        reporter: &mut R,
        logger: &mut L,
        summary: &mut RefreshSummary,
    ) where
        R: ReportSink + ?Sized,
        L: LogSink + ?Sized,
    {
        let description = self
            .policy
            .describe_failure(resource, transition.current.as_ref());

        let event = ReportEvent {
            title: format!("{}: {}", self.policy.failure_summary(), description.message),
            context: self.policy.failure_context().to_string(),
            component: self.policy.component().to_string(),
            metadata: self.policy.report_metadata(resource, transition, &description),
        };
        match reporter.report(&event) {
            Ok(()) => summary.failures_reported += 1,
            Err(e) => {
                summary.sink_failures += 1;
                tracing::warn!(
                    component = self.policy.component(),
                    resource = %transition.id,
                    error = %e,
                    "report sink failed; transition still recorded"
                );
            }
        }

        let mut fields = self.policy.log_fields(resource);
        fields.insert(
            "errorDetails".to_string(),
            serde_json::to_value(&description).unwrap_or_default(),
        );
        fields.insert("previousPhase".to_string(), phase_value(transition.previous.as_ref()));
        fields.insert("currentPhase".to_string(), phase_value(transition.current.as_ref()));
        let record = LogRecord {
            message: self.policy.failure_summary().to_string(),
            resource: transition.id.clone(),
            fields,
        };
        if let Err(e) = logger.log(&record) {
            summary.sink_failures += 1;
            tracing::warn!(
                component = self.policy.component(),
                resource = %transition.id,
                error = %e,
                "log sink failed"
            );
        }
    }
}

/// JSON value of an observed phase, `null` when absent.
#[must_use]
pub fn phase_value(phase: Option<&Phase>) -> JsonValue {
    phase.map_or(JsonValue::Null, |p| JsonValue::from(p.as_str()))
}

// =============================================================================
// TESTS
// =============================================================================
