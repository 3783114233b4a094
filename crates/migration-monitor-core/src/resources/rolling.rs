//! Rolling migration plan object.
//!
//! A rolling plan migrates a sequence of clusters, each with its own VM
//! sequence, under one strategy.

use super::ObjectMeta;
use crate::conditions::Condition;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A multi-step rolling migration plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingMigrationPlan {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<RollingMigrationPlanSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RollingMigrationPlanStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingMigrationPlanSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_sequence: Vec<ClusterMigration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bm_config_ref: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_strategy: Option<RollingMigrationStrategy>,
}

/// One cluster step of a rolling plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMigration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// VMs migrated in this step; entries are passed through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vm_sequence: Vec<JsonValue>,
}

/// Reference to another object by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollingMigrationStrategy {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingMigrationPlanStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Remaining status fields, kept for the report payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl RollingMigrationPlan {
    /// Create a plan with a name and phase.
    #[must_use]
    pub fn new(name: impl Into<String>, phase: Option<&str>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: None,
            },
            spec: None,
            status: Some(RollingMigrationPlanStatus {
                phase: phase.map(str::to_string),
                ..RollingMigrationPlanStatus::default()
            }),
        }
    }

    /// Reported phase.
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.phase.as_deref())
    }

    /// Non-empty status message.
    #[must_use]
    pub fn migration_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.migration_message.as_deref())
            .filter(|m| !m.is_empty())
    }

    /// Status conditions, empty when none were reported.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
    }

    fn cluster_sequence(&self) -> &[ClusterMigration] {
        self.spec
            .as_ref()
            .map_or(&[], |s| s.cluster_sequence.as_slice())
    }

    /// Name of the first cluster in the sequence.
    #[must_use]
    pub fn first_cluster_name(&self) -> Option<&str> {
        self.cluster_sequence()
            .first()
            .and_then(|c| c.cluster_name.as_deref())
    }

    /// Number of clusters in the sequence.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_sequence().len()
    }

    /// Number of VMs in the first cluster step.
    #[must_use]
    pub fn first_cluster_vm_count(&self) -> usize {
        self.cluster_sequence()
            .first()
            .map_or(0, |c| c.vm_sequence.len())
    }

    /// Name of the referenced bare-metal config.
    #[must_use]
    pub fn bm_config_name(&self) -> Option<&str> {
        self.spec
            .as_ref()
            .and_then(|s| s.bm_config_ref.as_ref())
            .and_then(|r| r.name.as_deref())
    }

    /// Migration strategy type.
    #[must_use]
    pub fn strategy_type(&self) -> Option<&str> {
        self.spec
            .as_ref()
            .and_then(|s| s.migration_strategy.as_ref())
            .and_then(|s| s.strategy_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_default_on_missing_spec() {
        let plan = RollingMigrationPlan::new("p1", None);
        assert_eq!(plan.first_cluster_name(), None);
        assert_eq!(plan.cluster_count(), 0);
        assert_eq!(plan.first_cluster_vm_count(), 0);
        assert_eq!(plan.bm_config_name(), None);
        assert_eq!(plan.strategy_type(), None);
        assert_eq!(plan.migration_message(), None);
    }

    #[test]
    fn full_plan_deserializes() {
        let json = r#"{
            "metadata": {"name": "rolling-1", "namespace": "migration-system"},
            "spec": {
                "clusterSequence": [
                    {"clusterName": "cluster-a", "vmSequence": [{"vmName": "vm1"}, {"vmName": "vm2"}]},
                    {"clusterName": "cluster-b", "vmSequence": []}
                ],
                "bmConfigRef": {"name": "maas-config"},
                "migrationStrategy": {"type": "cold"}
            },
            "status": {"phase": "Failed", "migrationMessage": "host evacuation failed", "currentCluster": "cluster-a"}
        }"#;
        let plan: RollingMigrationPlan = serde_json::from_str(json).expect("parse");
        assert_eq!(plan.first_cluster_name(), Some("cluster-a"));
        assert_eq!(plan.cluster_count(), 2);
        assert_eq!(plan.first_cluster_vm_count(), 2);
        assert_eq!(plan.bm_config_name(), Some("maas-config"));
        assert_eq!(plan.strategy_type(), Some("cold"));
        assert_eq!(plan.migration_message(), Some("host evacuation failed"));
        let status = plan.status.as_ref().expect("status");
        assert_eq!(status.extra["currentCluster"], JsonValue::from("cluster-a"));
    }
}
