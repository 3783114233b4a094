//! # Migration Monitor HTTP API Module
//!
//! This module implements the HTTP REST API server using axum. A cluster
//! watcher pushes full collections; the API answers with what changed.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Tracked resources and report counters
//! - `GET /reports?limit=N` - Most recent failure reports
//! - `POST /refresh` - Refresh both kinds from a snapshot
//! - `POST /refresh/migrations` - Refresh the migration collection
//! - `POST /refresh/rolling-migration-plans` - Refresh the rolling plan collection
//!
//! ## Security Configuration
//!
//! - `[server] cors_origins`: allowed origins, `["*"]` for all (default: localhost only)
//! - `[server] rate_limit`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    health_handler, refresh_handler, refresh_migrations_handler, refresh_rolling_plans_handler,
    reports_handler, status_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    DEFAULT_REPORTS_LIMIT, HealthResponse, RefreshResponse, ReportsQuery, ReportsResponse,
    StatusResponse,
};

use crate::SharedMonitor;
use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use migration_monitor_core::MonitorError;
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (32 MB).
pub const MAX_BODY_SIZE: usize = 32 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the monitor.
#[derive(Clone)]
pub struct AppState {
    pub monitor: SharedMonitor,
}

impl AppState {
    #[must_use]
    pub fn new(monitor: SharedMonitor) -> Self {
        Self { monitor }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }
    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/reports", get(handlers::reports_handler))
        .route("/refresh", post(handlers::refresh_handler))
        .route(
            "/refresh/migrations",
            post(handlers::refresh_migrations_handler),
        )
        .route(
            "/refresh/rolling-migration-plans",
            post(handlers::refresh_rolling_plans_handler),
        );

    if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(config.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(build_cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve the API until `shutdown` resolves.
pub async fn run_server<S>(
    config: &ServerConfig,
    state: AppState,
    shutdown: S,
) -> Result<(), MonitorError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state, config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MonitorError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Migration monitor HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| MonitorError::IoError(format!("Server error: {}", e)))
}
