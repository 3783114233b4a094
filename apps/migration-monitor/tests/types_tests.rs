//! Unit tests for API types and configuration serialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use migration_monitor::api::{
    DEFAULT_REPORTS_LIMIT, HealthResponse, RefreshResponse, ReportsQuery, StatusResponse,
};
use migration_monitor::config::{DEFAULT_RATE_LIMIT, MonitorConfig};
use migration_monitor_core::{MonitorSummary, RefreshSummary};
use std::path::PathBuf;

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_serialization() {
    let status = StatusResponse {
        tracked_migrations: 3,
        tracked_rolling_migration_plans: 1,
        refreshes: 10,
        reports_sent: 2,
        report_log: None,
    };
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["tracked_migrations"], 3);
    assert_eq!(json["reports_sent"], 2);
    assert!(json["report_log"].is_null());
}

// =============================================================================
// REFRESH RESPONSE TESTS
// =============================================================================

#[test]
fn test_refresh_response_snapshot() {
    let summary = MonitorSummary {
        migrations: RefreshSummary {
            failures_reported: 2,
            ..RefreshSummary::default()
        },
        rolling_migration_plans: RefreshSummary {
            failures_reported: 1,
            ..RefreshSummary::default()
        },
    };
    let response = RefreshResponse::snapshot(summary);
    assert!(response.success);
    assert_eq!(response.failures_reported(), 3);
    assert!(response.error.is_none());
}

#[test]
fn test_refresh_response_error() {
    let response = RefreshResponse::error("bad input");
    assert!(!response.success);
    assert_eq!(response.failures_reported(), 0);
    assert_eq!(response.error.as_deref(), Some("bad input"));
}

// =============================================================================
// REPORTS QUERY TESTS
// =============================================================================

#[test]
fn test_reports_query_default_limit() {
    assert_eq!(ReportsQuery::default().limit(), DEFAULT_REPORTS_LIMIT);
    assert_eq!(ReportsQuery { limit: Some(5) }.limit(), 5);
}

// =============================================================================
// CONFIG FILE TESTS
// =============================================================================

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitor.toml");
    std::fs::write(
        &path,
        r#"
[server]
host = "0.0.0.0"
port = 9000

[watch]
interval_secs = 10

[report]
output = "reports.jsonl"
retained = 16
"#,
    )
    .unwrap();

    let config = MonitorConfig::from_file(&path).unwrap();
    assert_eq!(config.server.addr(), "0.0.0.0:9000");
    assert_eq!(config.server.rate_limit, DEFAULT_RATE_LIMIT);
    assert_eq!(config.watch.interval_secs, 10);
    assert_eq!(config.report.output, Some(PathBuf::from("reports.jsonl")));
    assert_eq!(config.report.retained, 16);
}

#[test]
fn test_config_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(MonitorConfig::from_file(&dir.path().join("absent.toml")).is_err());
}
