//! # Status Monitor
//!
//! Combines the migration and rolling-plan observers with one report sink
//! and one log sink.
//!
//! Each observer keeps its own transition store; the two kinds never see
//! each other's records even when names collide.
//!
//! ## Snapshots
//!
//! A `Snapshot` is one watcher tick: the full list of both kinds. Decoding
//! helpers enforce `MAX_SNAPSHOT_RESOURCES` before anything reaches an
//! observer.

use crate::adapters::{
    MigrationPolicy, MigrationStatusMonitor, RollingMigrationsStatusMonitor, RollingPlanPolicy,
};
use crate::observer::RefreshSummary;
use crate::primitives::MAX_SNAPSHOT_RESOURCES;
use crate::sink::{LogSink, ReportSink};
use crate::{Migration, MonitorError, RollingMigrationPlan};
use serde::{Deserialize, Serialize};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Full collections of both watched kinds at one refresh tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub migrations: Vec<Migration>,
    #[serde(default)]
    pub rolling_migration_plans: Vec<RollingMigrationPlan>,
}

impl Snapshot {
    /// Total number of resources in the snapshot.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.migrations.len() + self.rolling_migration_plans.len()
    }

    /// Reject snapshots above `MAX_SNAPSHOT_RESOURCES`.
    pub fn validate(&self) -> Result<(), MonitorError> {
        check_size(self.resource_count())
    }
}

/// Reject collections above `MAX_SNAPSHOT_RESOURCES`.
pub fn check_size(count: usize) -> Result<(), MonitorError> {
    if count > MAX_SNAPSHOT_RESOURCES {
        return Err(MonitorError::SnapshotTooLarge {
            count,
            max: MAX_SNAPSHOT_RESOURCES,
        });
    }
    Ok(())
}

/// Decode a single snapshot from JSON.
pub fn snapshot_from_json(bytes: &[u8]) -> Result<Snapshot, MonitorError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)
        .map_err(|e| MonitorError::InvalidSnapshot(e.to_string()))?;
    snapshot.validate()?;
    Ok(snapshot)
}

/// Decode a sequence of snapshots.
///
/// Accepts either a JSON array of snapshots or a stream of snapshot
/// objects separated by whitespace: one per line, several per line, or
/// pretty-printed across lines.
pub fn snapshots_from_json(bytes: &[u8]) -> Result<Vec<Snapshot>, MonitorError> {
    let trimmed = bytes.trim_ascii_start();
    let snapshots: Vec<Snapshot> = if trimmed.first() == Some(&b'[') {
        serde_json::from_slice(trimmed).map_err(|e| MonitorError::InvalidSnapshot(e.to_string()))?
    } else {
        serde_json::Deserializer::from_slice(trimmed)
            .into_iter::<Snapshot>()
            .enumerate()
            .map(|(n, item)| {
                item.map_err(|e| {
                    MonitorError::InvalidSnapshot(format!("snapshot {}: {}", n + 1, e))
                })
            })
            .collect::<Result<_, _>>()?
    };
    for snapshot in &snapshots {
        snapshot.validate()?;
    }
    Ok(snapshots)
}

// =============================================================================
// STATUS MONITOR
// =============================================================================

/// Counters of one combined refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonitorSummary {
    pub migrations: RefreshSummary,
    pub rolling_migration_plans: RefreshSummary,
}

impl MonitorSummary {
    /// Fold another summary into this one.
    pub fn absorb(&mut self, other: &MonitorSummary) {
        self.migrations.absorb(&other.migrations);
        self.rolling_migration_plans
            .absorb(&other.rolling_migration_plans);
    }

    /// Failure reports delivered across both kinds.
    #[must_use]
    pub fn failures_reported(&self) -> usize {
        self.migrations.failures_reported + self.rolling_migration_plans.failures_reported
    }
}

/// Both observers plus the sinks they report to.
#[derive(Debug)]
pub struct StatusMonitor<R, L> {
    migrations: MigrationStatusMonitor,
    rolling_plans: RollingMigrationsStatusMonitor,
    reporter: R,
    logger: L,
    refreshes: u64,
}

impl<R: ReportSink, L: LogSink> StatusMonitor<R, L> {
    /// Create a monitor with empty transition memory.
    #[must_use]
    pub fn new(reporter: R, logger: L) -> Self {
        Self {
            migrations: MigrationStatusMonitor::new(MigrationPolicy),
            rolling_plans: RollingMigrationsStatusMonitor::new(RollingPlanPolicy),
            reporter,
            logger,
            refreshes: 0,
        }
    }

    /// Refresh the migration collection.
    pub fn refresh_migrations(&mut self, migrations: &[Migration]) -> RefreshSummary {
        self.refreshes = self.refreshes.saturating_add(1);
        self.migrations
            .refresh(migrations, &mut self.reporter, &mut self.logger)
    }

    /// Refresh the rolling plan collection.
    pub fn refresh_rolling_plans(&mut self, plans: &[RollingMigrationPlan]) -> RefreshSummary {
        self.refreshes = self.refreshes.saturating_add(1);
        self.rolling_plans
            .refresh(plans, &mut self.reporter, &mut self.logger)
    }

    /// Refresh both collections from one snapshot.
    ///
    /// Counts as a single refresh.
    pub fn refresh(&mut self, snapshot: &Snapshot) -> MonitorSummary {
        self.refreshes = self.refreshes.saturating_add(1);
        MonitorSummary {
            migrations: self.migrations.refresh(
                &snapshot.migrations,
                &mut self.reporter,
                &mut self.logger,
            ),
            rolling_migration_plans: self.rolling_plans.refresh(
                &snapshot.rolling_migration_plans,
                &mut self.reporter,
                &mut self.logger,
            ),
        }
    }

    /// The migration observer.
    #[must_use]
    pub fn migrations(&self) -> &MigrationStatusMonitor {
        &self.migrations
    }

    /// The rolling plan observer.
    #[must_use]
    pub fn rolling_plans(&self) -> &RollingMigrationsStatusMonitor {
        &self.rolling_plans
    }

    /// The report sink.
    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// The log sink.
    #[must_use]
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Number of refresh calls processed.
    #[must_use]
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Forget all transition memory of both observers.
    pub fn reset(&mut self) {
        self.migrations.reset();
        self.rolling_plans.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemoryLogSink, MemoryReportSink};

    fn monitor() -> StatusMonitor<MemoryReportSink, MemoryLogSink> {
        StatusMonitor::new(MemoryReportSink::new(), MemoryLogSink::new())
    }

    #[test]
    fn observers_do_not_share_memory() {
        let mut m = monitor();
        let snapshot = Snapshot {
            migrations: vec![Migration::new("shared", Some("Running"))],
            rolling_migration_plans: vec![RollingMigrationPlan::new("shared", Some("Running"))],
        };
        m.refresh(&snapshot);

        let failed_migration = Snapshot {
            migrations: vec![Migration::new("shared", Some("Failed"))],
            rolling_migration_plans: vec![RollingMigrationPlan::new("shared", Some("Running"))],
        };
        let summary = m.refresh(&failed_migration);

        assert_eq!(summary.migrations.failures_reported, 1);
        assert_eq!(summary.rolling_migration_plans.failures_reported, 0);
        assert_eq!(m.reporter().len(), 1);
        assert_eq!(m.refreshes(), 2);
    }

    #[test]
    fn empty_kind_keeps_its_records() {
        let mut m = monitor();
        m.refresh(&Snapshot {
            migrations: vec![Migration::new("m1", Some("Running"))],
            rolling_migration_plans: vec![RollingMigrationPlan::new("p1", Some("Running"))],
        });
        m.refresh(&Snapshot {
            migrations: vec![Migration::new("m1", Some("Running"))],
            rolling_migration_plans: Vec::new(),
        });

        assert_eq!(m.rolling_plans().tracked(), 1);
    }

    #[test]
    fn reset_clears_both_observers() {
        let mut m = monitor();
        m.refresh_migrations(&[Migration::new("m1", Some("Running"))]);
        m.refresh_rolling_plans(&[RollingMigrationPlan::new("p1", Some("Running"))]);
        m.reset();

        assert_eq!(m.migrations().tracked(), 0);
        assert_eq!(m.rolling_plans().tracked(), 0);
        assert!(m.logger().is_empty());
    }

    #[test]
    fn decodes_single_snapshot() {
        let json = br#"{"migrations":[{"metadata":{"name":"m1"},"status":{"phase":"Running"}}]}"#;
        let snapshot = snapshot_from_json(json).expect("decode");
        assert_eq!(snapshot.migrations.len(), 1);
        assert!(snapshot.rolling_migration_plans.is_empty());
    }

    #[test]
    fn decodes_snapshot_array_and_lines() {
        let array = br#"[{"migrations":[]},{"rollingMigrationPlans":[{"metadata":{"name":"p1"}}]}]"#;
        assert_eq!(snapshots_from_json(array).expect("array").len(), 2);

        let lines = b"{\"migrations\":[]}\n\n{\"migrations\":[]}\n";
        assert_eq!(snapshots_from_json(lines).expect("lines").len(), 2);
    }

    #[test]
    fn reports_bad_snapshot_position() {
        let lines = b"{\"migrations\":[]}\nnot json\n";
        let err = snapshots_from_json(lines).expect_err("invalid");
        let text = err.to_string();
        assert!(text.contains("snapshot 2"));
        assert!(text.contains("line 2"));
    }

    #[test]
    fn decodes_pretty_printed_snapshot_stream() {
        let pretty = br#"{
  "migrations": [
    {"metadata": {"name": "m1"}, "status": {"phase": "Running"}}
  ]
}
{
  "migrations": [
    {"metadata": {"name": "m1"}, "status": {"phase": "Failed"}}
  ]
}
"#;
        let snapshots = snapshots_from_json(pretty).expect("stream");
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].migrations[0].phase(), Some("Failed"));

        let single = br#"{
  "migrations": [{"metadata": {"name": "m1"}}]
}"#;
        assert_eq!(
            snapshots_from_json(single).expect("single"),
            vec![snapshot_from_json(single).expect("single")]
        );
    }

    #[test]
    fn decodes_objects_sharing_a_line() {
        let same_line = br#"{"migrations":[]} {"migrations":[]}"#;
        assert_eq!(snapshots_from_json(same_line).expect("same line").len(), 2);
        assert!(snapshots_from_json(b"  \n").expect("blank").is_empty());
    }

    #[test]
    fn rejects_oversized_snapshot() {
        let snapshot = Snapshot {
            migrations: vec![Migration::default(); MAX_SNAPSHOT_RESOURCES + 1],
            rolling_migration_plans: Vec::new(),
        };
        assert!(matches!(
            snapshot.validate(),
            Err(MonitorError::SnapshotTooLarge { .. })
        ));
    }
}
