use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::extract::Json;
use crate::state::AppState;

/// Liveness plus database reachability. Public; no token required.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of the `SELECT 1` check, absent when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_latency_ms: Option<u64>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let db_result = lingo_db::health_check(&state.pool).await;

    let db_latency_ms = match &db_result {
        Ok(()) => Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
        Err(err) => {
            tracing::warn!(error = %err, "Health check: database unreachable");
            None
        }
    };
    let db_healthy = db_result.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_latency_ms,
    })
}

/// `/health` lives beside `/api/v1`, not under it, so load balancers can
/// reach it without credentials.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
