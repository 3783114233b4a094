//! Rolling migration plan adapter.

use super::{MIGRATION_TERMINAL_PHASES, describe_from_conditions, opt_str};
use crate::observer::{Metadata, PhaseObserver, PhasePolicy, phase_value};
use crate::{
    FailureDescription, Phase, PhaseTransition, ResourceId, RollingMigrationPlan, TerminalPhase,
};
use serde_json::Value as JsonValue;

/// Observer of rolling migration plans.
pub type RollingMigrationsStatusMonitor = PhaseObserver<RollingPlanPolicy>;

/// Policy for [`RollingMigrationPlan`] objects.
///
/// The failure message prefers `status.migrationMessage` over conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingPlanPolicy;

impl RollingPlanPolicy {
    pub const KIND: &'static str = "Rolling Migration Plan";
    pub const COMPONENT: &'static str = "RollingMigrationsStatusMonitor";
    pub const FAILURE_CONTEXT: &'static str = "rolling-migration-plan-execution-failure";
    pub const FAILURE_ACTION: &'static str = "rolling-migration-plan-execution-failed";
}

impl PhasePolicy for RollingPlanPolicy {
    type Resource = RollingMigrationPlan;

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
        "Rolling migration plan execution failed"
    }

    fn identify(&self, resource: &RollingMigrationPlan) -> Option<ResourceId> {
        resource.metadata.name().map(ResourceId::from)
    }

    fn current_phase(&self, resource: &RollingMigrationPlan) -> Option<Phase> {
        resource.phase().map(Phase::from)
    }

    fn terminal_phases(&self) -> &[TerminalPhase] {
        &MIGRATION_TERMINAL_PHASES
    }

    fn describe_failure(
        &self,
        resource: &RollingMigrationPlan,
        phase: Option<&Phase>,
    ) -> FailureDescription {
        describe_from_conditions(
            Self::KIND,
            phase,
            resource.conditions(),
            resource.migration_message(),
        )
    }

    fn report_metadata(
        &self,
        resource: &RollingMigrationPlan,
        transition: &PhaseTransition,
        description: &FailureDescription,
    ) -> Metadata {
        let mut m = Metadata::new();
        m.insert(
            "rollingMigrationPlanName".into(),
            JsonValue::from(transition.id.as_str()),
        );
        m.insert("clusterName".into(), opt_str(resource.first_cluster_name()));
        m.insert("previousPhase".into(), phase_value(transition.previous.as_ref()));
        m.insert("currentPhase".into(), phase_value(transition.current.as_ref()));
        m.insert("errorMessage".into(), JsonValue::from(description.message.as_str()));
        m.insert("bmConfigRef".into(), opt_str(resource.bm_config_name()));
        m.insert(
            "clusterSequenceLength".into(),
            JsonValue::from(resource.cluster_count()),
        );
        m.insert(
            "vmSequenceLength".into(),
            JsonValue::from(resource.first_cluster_vm_count()),
        );
        m.insert("namespace".into(), opt_str(resource.metadata.namespace.as_deref()));
        m.insert("migrationStrategy".into(), opt_str(resource.strategy_type()));
        m.insert(
            "fullStatus".into(),
            serde_json::to_value(&resource.status).unwrap_or_default(),
        );
        m.insert("action".into(), JsonValue::from(Self::FAILURE_ACTION));
        m
    }

    fn log_fields(&self, resource: &RollingMigrationPlan) -> Metadata {
        let mut m = Metadata::new();
        m.insert(
            "rollingMigrationPlan".into(),
            serde_json::to_value(resource).unwrap_or_default(),
        );
        m
    }
}
