//! # Refresh Benchmarks
//!
//! Performance benchmarks for migration-monitor-core refresh passes.
//!
//! Run with: `cargo bench -p migration-monitor-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use migration_monitor_core::{
    Migration, MigrationPolicy, MigrationStatusMonitor, NullSink, RollingMigrationPlan, Snapshot,
    StatusMonitor,
};
use std::hint::black_box;

/// Collection of `size` migrations, all in the same phase.
fn migrations(size: usize, phase: &str) -> Vec<Migration> {
    (0..size)
        .map(|i| Migration::new(format!("migration-{i}"), Some(phase)))
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("steady_state_refresh");

    for size in [100, 1000, 10000].iter() {
        let collection = migrations(*size, "CopyingBlocks");
        let mut monitor = MigrationStatusMonitor::new(MigrationPolicy);
        monitor.refresh(&collection, &mut NullSink, &mut NullSink);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(monitor.refresh(&collection, &mut NullSink, &mut NullSink)));
        });
    }

    group.finish();
}

fn bench_mass_failure(c: &mut Criterion) {
    let mut group = c.benchmark_group("mass_failure_refresh");

    for size in [100, 1000].iter() {
        let running = migrations(*size, "CopyingBlocks");
        let failed = migrations(*size, "Failed");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut monitor = MigrationStatusMonitor::new(MigrationPolicy);
                monitor.refresh(&running, &mut NullSink, &mut NullSink);
                black_box(monitor.refresh(&failed, &mut NullSink, &mut NullSink))
            });
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_cleanup");

    for size in [100, 1000].iter() {
        let full = migrations(*size, "Pending");
        let half: Vec<Migration> = full.iter().step_by(2).cloned().collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut monitor = MigrationStatusMonitor::new(MigrationPolicy);
                monitor.refresh(&full, &mut NullSink, &mut NullSink);
                black_box(monitor.refresh(&half, &mut NullSink, &mut NullSink))
            });
        });
    }

    group.finish();
}

fn bench_combined_snapshot(c: &mut Criterion) {
    let snapshot = Snapshot {
        migrations: migrations(1000, "CopyingBlocks"),
        rolling_migration_plans: (0..100)
            .map(|i| RollingMigrationPlan::new(format!("plan-{i}"), Some("Running")))
            .collect(),
    };
    let mut monitor = StatusMonitor::new(NullSink, NullSink);
    monitor.refresh(&snapshot);

    c.bench_function("combined_snapshot_refresh", |b| {
        b.iter(|| black_box(monitor.refresh(&snapshot)));
    });
}

criterion_group!(
    benches,
    bench_steady_state,
    bench_mass_failure,
    bench_churn,
    bench_combined_snapshot
);
criterion_main!(benches);
