//! Single VM migration adapter.

use super::{MIGRATION_TERMINAL_PHASES, describe_from_conditions, opt_str};
use crate::observer::{Metadata, PhaseObserver, PhasePolicy, phase_value};
use crate::primitives::is_known_migration_phase;
use crate::{FailureDescription, Migration, Phase, PhaseTransition, ResourceId, TerminalPhase};
use serde_json::Value as JsonValue;

/// Observer of single VM migrations.
pub type MigrationStatusMonitor = PhaseObserver<MigrationPolicy>;

/// Policy for [`Migration`] objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationPolicy;

impl MigrationPolicy {
    pub const KIND: &'static str = "Migration";
    pub const COMPONENT: &'static str = "MigrationStatusMonitor";
    pub const FAILURE_CONTEXT: &'static str = "migration-execution-failure";
    pub const FAILURE_ACTION: &'static str = "migration-execution-failed";
}

impl PhasePolicy for MigrationPolicy {
    type Resource = Migration;

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn component(&self) -> &'static str {
        Self::COMPONENT
    }

    fn failure_context(&self) -> &'static str {
        Self::FAILURE_CONTEXT
    }

    fn failure_summary(&self) -> &'static str {
        "Migration execution failed"
    }

    fn identify(&self, resource: &Migration) -> Option<ResourceId> {
        resource.metadata.name().map(ResourceId::from)
    }

    fn current_phase(&self, resource: &Migration) -> Option<Phase> {
        let phase = resource.phase()?;
        if !is_known_migration_phase(phase) {
            tracing::debug!(
                component = Self::COMPONENT,
                phase,
                "unrecognized migration phase; tracked verbatim"
            );
        }
        Some(Phase::from(phase))
    }

    fn terminal_phases(&self) -> &[TerminalPhase] {
        &MIGRATION_TERMINAL_PHASES
    }

    fn describe_failure(&self, resource: &Migration, phase: Option<&Phase>) -> FailureDescription {
        describe_from_conditions(Self::KIND, phase, resource.conditions(), None)
    }

    fn report_metadata(
        &self,
        resource: &Migration,
        transition: &PhaseTransition,
        description: &FailureDescription,
    ) -> Metadata {
        let mut m = Metadata::new();
        m.insert("migrationName".into(), JsonValue::from(transition.id.as_str()));
        m.insert("migrationPlan".into(), opt_str(resource.migration_plan()));
        m.insert("vmName".into(), opt_str(resource.vm_name()));
        m.insert("podRef".into(), opt_str(resource.pod_ref()));
        m.insert("previousPhase".into(), phase_value(transition.previous.as_ref()));
        m.insert("currentPhase".into(), phase_value(transition.current.as_ref()));
        m.insert("errorMessage".into(), JsonValue::from(description.message.as_str()));
        m.insert("errorReason".into(), JsonValue::from(description.reason.as_str()));
        m.insert("failureTime".into(), opt_str(description.timestamp.as_deref()));
        m.insert("namespace".into(), opt_str(resource.metadata.namespace.as_deref()));
        m.insert(
            "conditions".into(),
            serde_json::to_value(resource.conditions()).unwrap_or_default(),
        );
        m.insert("action".into(), JsonValue::from(Self::FAILURE_ACTION));
        m
    }

    fn log_fields(&self, resource: &Migration) -> Metadata {
        let mut m = Metadata::new();
        m.insert(
            "migration".into(),
            serde_json::to_value(resource).unwrap_or_default(),
        );
        m
    }
}
