//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{HealthResponse, RefreshResponse, ReportsQuery, ReportsResponse, StatusResponse},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use migration_monitor_core::{Migration, RollingMigrationPlan, Snapshot, monitor::check_size};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get monitor status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let monitor = state.monitor.lock().await;

    let response = StatusResponse {
        tracked_migrations: monitor.migrations().tracked(),
        tracked_rolling_migration_plans: monitor.rolling_plans().tracked(),
        refreshes: monitor.refreshes(),
        reports_sent: monitor.reporter().total(),
        report_log: monitor
            .reporter()
            .path()
            .map(|p| p.display().to_string()),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// REPORTS HANDLER
// =============================================================================

/// List the most recent failure reports.
pub async fn reports_handler(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> impl IntoResponse {
    let monitor = state.monitor.lock().await;
    let reporter = monitor.reporter();

    let response = ReportsResponse {
        total: reporter.total(),
        reports: reporter.recent(query.limit()),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// REFRESH HANDLERS
// =============================================================================

/// Refresh both kinds from a full snapshot.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> impl IntoResponse {
    if let Err(e) = snapshot.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(RefreshResponse::error(format!("Invalid snapshot: {}", e))),
        );
    }

    let mut monitor = state.monitor.lock().await;
    let summary = monitor.refresh(&snapshot);
    (StatusCode::OK, Json(RefreshResponse::snapshot(summary)))
}

/// Refresh the migration collection only.
pub async fn refresh_migrations_handler(
    State(state): State<AppState>,
    Json(migrations): Json<Vec<Migration>>,
) -> impl IntoResponse {
    if let Err(e) = check_size(migrations.len()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(RefreshResponse::error(format!("Invalid collection: {}", e))),
        );
    }

    let mut monitor = state.monitor.lock().await;
    let summary = monitor.refresh_migrations(&migrations);
    (StatusCode::OK, Json(RefreshResponse::migrations(summary)))
}

/// Refresh the rolling migration plan collection only.
pub async fn refresh_rolling_plans_handler(
    State(state): State<AppState>,
    Json(plans): Json<Vec<RollingMigrationPlan>>,
) -> impl IntoResponse {
    if let Err(e) = check_size(plans.len()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(RefreshResponse::error(format!("Invalid collection: {}", e))),
        );
    }

    let mut monitor = state.monitor.lock().await;
    let summary = monitor.refresh_rolling_plans(&plans);
    (
        StatusCode::OK,
        Json(RefreshResponse::rolling_migration_plans(summary)),
    )
}
