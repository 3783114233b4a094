//! Single VM migration object.

use super::ObjectMeta;
use crate::conditions::Condition;
use serde::{Deserialize, Serialize};

/// A single VM migration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<MigrationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MigrationStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Migration {
    /// Create a migration with a name and phase.
    #[must_use]
    pub fn new(name: impl Into<String>, phase: Option<&str>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: None,
            },
            spec: None,
            status: Some(MigrationStatus {
                phase: phase.map(str::to_string),
                conditions: Vec::new(),
            }),
        }
    }

    /// Reported phase.
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.phase.as_deref())
    }

    /// Status conditions, empty when none were reported.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
    }

    /// Plan this migration belongs to.
    #[must_use]
    pub fn migration_plan(&self) -> Option<&str> {
        self.spec.as_ref().and_then(|s| s.migration_plan.as_deref())
    }

    /// Name of the migrated VM.
    #[must_use]
    pub fn vm_name(&self) -> Option<&str> {
        self.spec.as_ref().and_then(|s| s.vm_name.as_deref())
    }

    /// Pod running the migration.
    #[must_use]
    pub fn pod_ref(&self) -> Option<&str> {
        self.spec.as_ref().and_then(|s| s.pod_ref.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_object_deserializes() {
        let m: Migration = serde_json::from_str(r#"{"metadata":{"name":"m1"}}"#).expect("parse");
        assert_eq!(m.metadata.name(), Some("m1"));
        assert_eq!(m.phase(), None);
        assert!(m.conditions().is_empty());
        assert_eq!(m.vm_name(), None);
    }

    #[test]
    fn full_object_deserializes() {
        let json = r#"{
            "apiVersion": "vjailbreak.k8s.pf9.io/v1alpha1",
            "kind": "Migration",
            "metadata": {"name": "migration-web-01", "namespace": "migration-system"},
            "spec": {"migrationPlan": "plan-a", "vmName": "web-01", "podRef": "v2v-helper-web-01"},
            "status": {
                "phase": "Failed",
                "conditions": [{"type": "Failed", "reason": "CopyError", "message": "copy failed", "lastTransitionTime": "2025-03-01T10:00:00Z"}]
            }
        }"#;
        let m: Migration = serde_json::from_str(json).expect("parse");
        assert_eq!(m.phase(), Some("Failed"));
        assert_eq!(m.migration_plan(), Some("plan-a"));
        assert_eq!(m.pod_ref(), Some("v2v-helper-web-01"));
        assert_eq!(m.conditions().len(), 1);
        assert_eq!(m.metadata.namespace.as_deref(), Some("migration-system"));
    }

    #[test]
    fn empty_name_is_missing() {
        let m = Migration::new("", Some("Running"));
        assert_eq!(m.metadata.name(), None);
    }
}
