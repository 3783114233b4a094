//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Refresh
//! request bodies reuse the core `Snapshot` and resource models directly.

use crate::sinks::ReportEntry;
use migration_monitor_core::{MonitorSummary, RefreshSummary};
use serde::{Deserialize, Serialize};

/// Reports returned by `GET /reports` when no limit is given.
pub const DEFAULT_REPORTS_LIMIT: usize = 50;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Monitor status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Migrations with transition memory.
    pub tracked_migrations: usize,
    /// Rolling migration plans with transition memory.
    pub tracked_rolling_migration_plans: usize,
    /// Refresh passes processed since start.
    pub refreshes: u64,
    /// Failure reports delivered since start.
    pub reports_sent: u64,
    /// JSON lines file receiving reports, if any.
    pub report_log: Option<String>,
}

// =============================================================================
// REPORTS
// =============================================================================

/// Query string of `GET /reports`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsQuery {
    pub limit: Option<usize>,
}

impl ReportsQuery {
    /// Requested limit, or `DEFAULT_REPORTS_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_REPORTS_LIMIT)
    }
}

/// Retained failure reports, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsResponse {
    /// Reports delivered since start, including ones no longer retained.
    pub total: u64,
    pub reports: Vec<ReportEntry>,
}

// =============================================================================
// REFRESH RESPONSE
// =============================================================================

/// Result of a refresh request.
///
/// A summary is present for each kind the request refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub migrations: Option<RefreshSummary>,
    pub rolling_migration_plans: Option<RefreshSummary>,
    pub error: Option<String>,
}

impl RefreshResponse {
    /// Both kinds refreshed from one snapshot.
    pub fn snapshot(summary: MonitorSummary) -> Self {
        Self {
            success: true,
            migrations: Some(summary.migrations),
            rolling_migration_plans: Some(summary.rolling_migration_plans),
            error: None,
        }
    }

    /// Only migrations refreshed.
    pub fn migrations(summary: RefreshSummary) -> Self {
        Self {
            success: true,
            migrations: Some(summary),
            rolling_migration_plans: None,
            error: None,
        }
    }

    /// Only rolling plans refreshed.
    pub fn rolling_migration_plans(summary: RefreshSummary) -> Self {
        Self {
            success: true,
            migrations: None,
            rolling_migration_plans: Some(summary),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            migrations: None,
            rolling_migration_plans: None,
            error: Some(msg.into()),
        }
    }

    /// Failure reports delivered by this refresh.
    #[must_use]
    pub fn failures_reported(&self) -> usize {
        self.migrations.map_or(0, |s| s.failures_reported)
            + self.rolling_migration_plans.map_or(0, |s| s.failures_reported)
    }
}
