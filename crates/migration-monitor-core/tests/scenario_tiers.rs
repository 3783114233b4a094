//! # Scenario Tier Tests (T0-T3)
//!
//! If ANY tier fails, transition reporting is unreliable.
//!
//! ## Tiers
//! - T0: First Sighting
//! - T1: Single Report per Terminal Transition
//! - T2: Re-entry and Success Marking
//! - T3: Cleanup

use migration_monitor_core::{
    MemoryLogSink, MemoryReportSink, Migration, MigrationPolicy, MigrationStatusMonitor, Phase,
    ResourceId, RollingMigrationPlan, RollingMigrationsStatusMonitor, RollingPlanPolicy,
};

struct Migrations {
    monitor: MigrationStatusMonitor,
    reports: MemoryReportSink,
    logs: MemoryLogSink,
}

impl Migrations {
    fn new() -> Self {
        Self {
            monitor: MigrationStatusMonitor::new(MigrationPolicy),
            reports: MemoryReportSink::new(),
            logs: MemoryLogSink::new(),
        }
    }

    fn tick(&mut self, phases: &[(&str, &str)]) {
        let collection: Vec<Migration> = phases
            .iter()
            .map(|(name, phase)| Migration::new(*name, Some(phase)))
            .collect();
        self.monitor
            .refresh(&collection, &mut self.reports, &mut self.logs);
    }

    fn reports_for(&self, name: &str) -> usize {
        self.reports
            .events()
            .filter(|e| e.metadata["migrationName"] == name)
            .count()
    }
}

// =============================================================================
// TIER T0: FIRST SIGHTING
// =============================================================================

mod t0_first_sighting {
    use super::*;

    /// T0.1: A resource first seen in a terminal phase is not reported.
    #[test]
    fn terminal_first_sighting_is_silent() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Failed"), ("m2", "Succeeded")]);

        assert!(m.reports.is_empty());
        assert!(m.logs.is_empty());
        assert_eq!(m.monitor.tracked(), 2);
    }

    /// T0.2: The first observed phase becomes the baseline.
    #[test]
    fn baseline_is_recorded() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "CopyingBlocks")]);

        let record = m.monitor.record(&ResourceId::from("m1")).expect("record");
        assert_eq!(record.previous_phase, Some(Phase::from("CopyingBlocks")));
        assert_eq!(record.last_reported_phase, None);
    }
}

// =============================================================================
// TIER T1: SINGLE REPORT PER TERMINAL TRANSITION
// =============================================================================

mod t1_single_report {
    use super::*;

    /// T1.1: Running → Failed → Failed reports exactly once.
    #[test]
    fn scenario_a_failed_once() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running")]);
        assert!(m.reports.is_empty());

        m.tick(&[("m1", "Failed")]);
        assert_eq!(m.reports.len(), 1);
        let event = m.reports.events().next().expect("event");
        assert_eq!(event.context, "migration-execution-failure");

        m.tick(&[("m1", "Failed")]);
        assert_eq!(m.reports.len(), 1);
    }

    /// T1.2: Unchanged phases across many refreshes add nothing.
    #[test]
    fn unchanged_phase_is_idempotent() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running")]);
        m.tick(&[("m1", "Failed")]);
        for _ in 0..10 {
            m.tick(&[("m1", "Failed")]);
        }
        assert_eq!(m.reports_for("m1"), 1);
        assert_eq!(m.logs.len(), 1);
    }

    /// T1.3: Collection order does not change which resources are reported.
    #[test]
    fn order_is_irrelevant() {
        let mut forward = Migrations::new();
        forward.tick(&[("a", "Running"), ("b", "Running")]);
        forward.tick(&[("a", "Failed"), ("b", "Failed")]);

        let mut reverse = Migrations::new();
        reverse.tick(&[("b", "Running"), ("a", "Running")]);
        reverse.tick(&[("b", "Failed"), ("a", "Failed")]);

        for name in ["a", "b"] {
            assert_eq!(forward.reports_for(name), 1);
            assert_eq!(reverse.reports_for(name), 1);
        }
    }
}

// =============================================================================
// TIER T2: RE-ENTRY AND SUCCESS MARKING
// =============================================================================

mod t2_reentry {
    use super::*;

    /// T2.1: Failed → Succeeded → Failed reports both failures.
    #[test]
    fn terminal_reentry_reports_again() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running")]);
        m.tick(&[("m1", "Failed")]);
        m.tick(&[("m1", "Succeeded")]);
        m.tick(&[("m1", "Failed")]);

        assert_eq!(m.reports_for("m1"), 2);
        let record = m.monitor.record(&ResourceId::from("m1")).expect("record");
        assert_eq!(record.last_reported_phase, Some(Phase::from("Failed")));
    }

    /// T2.2: Running → Succeeded marks the plan without a failure report.
    #[test]
    fn scenario_b_success_is_silent() {
        let mut monitor = RollingMigrationsStatusMonitor::new(RollingPlanPolicy);
        let mut reports = MemoryReportSink::new();
        let mut logs = MemoryLogSink::new();

        monitor.refresh(
            &[RollingMigrationPlan::new("p2", Some("Running"))],
            &mut reports,
            &mut logs,
        );
        monitor.refresh(
            &[RollingMigrationPlan::new("p2", Some("Succeeded"))],
            &mut reports,
            &mut logs,
        );

        assert!(reports.is_empty());
        assert!(logs.is_empty());
        let record = monitor.record(&ResourceId::from("p2")).expect("record");
        assert_eq!(record.last_reported_phase, Some(Phase::from("Succeeded")));
    }

    /// T2.3: Leaving and re-entering the reported phase does not re-report.
    #[test]
    fn same_terminal_after_detour_is_silent() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running")]);
        m.tick(&[("m1", "Failed")]);
        m.tick(&[("m1", "Validating")]);
        m.tick(&[("m1", "Failed")]);

        assert_eq!(m.reports_for("m1"), 1);
    }
}

// =============================================================================
// TIER T3: CLEANUP
// =============================================================================

mod t3_cleanup {
    use super::*;

    /// T3.1: A vanished resource loses its record; its return is a first sighting.
    #[test]
    fn scenario_c_reappearance_is_first_sighting() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running"), ("m2", "Running")]);
        m.tick(&[("m1", "Running")]);
        assert!(m.monitor.record(&ResourceId::from("m2")).is_none());

        m.tick(&[("m1", "Running"), ("m2", "Failed")]);
        assert_eq!(m.reports_for("m2"), 0);
        assert!(m.monitor.record(&ResourceId::from("m2")).is_some());
    }

    /// T3.2: A forgotten reported resource can be reported again after return.
    #[test]
    fn forgotten_report_state_is_rebuilt() {
        let mut m = Migrations::new();
        m.tick(&[("m1", "Running"), ("keep", "Running")]);
        m.tick(&[("m1", "Failed"), ("keep", "Running")]);
        m.tick(&[("keep", "Running")]);
        m.tick(&[("m1", "Running"), ("keep", "Running")]);
        m.tick(&[("m1", "Failed"), ("keep", "Running")]);

        assert_eq!(m.reports_for("m1"), 2);
    }

    /// T3.3: Store size never exceeds the latest collection size.
    #[test]
    fn store_bounded_by_collection() {
        let mut m = Migrations::new();
        m.tick(&[("a", "Running"), ("b", "Running"), ("c", "Running")]);
        m.tick(&[("c", "Running")]);
        assert_eq!(m.monitor.tracked(), 1);
    }
}
