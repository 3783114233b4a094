//! # Resource Models
//!
//! Serde models of the cluster-native objects the monitor watches.
//!
//! Every field is optional and unknown fields are ignored: collections are
//! delivered mid-reconcile and partial objects are normal. Accessor methods
//! are total and return `None` or a default instead of failing.

mod migration;
mod rolling;

pub use migration::{Migration, MigrationSpec, MigrationStatus};
pub use rolling::{
    ClusterMigration, NamedRef, RollingMigrationPlan, RollingMigrationPlanSpec,
    RollingMigrationPlanStatus, RollingMigrationStrategy,
};

use serde::{Deserialize, Serialize};

/// Object metadata shared by all watched kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectMeta {
    /// Non-empty object name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}
