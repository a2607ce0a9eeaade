//! Liveness, readiness and full health reporting.
//!
//! `/health/live` answers as long as the process runs; `/health/ready` and
//! `/health` additionally require a reachable database, so orchestrators
//! stop routing traffic to an instance that lost its pool.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub payment_gateway: GatewayHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    /// Round-trip time of the probe query; absent when the probe failed.
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub mock: bool,
}

/// Body returned by the liveness and readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Round-trips a trivial query and reports its latency, or `None` when
/// the database is unreachable.
async fn probe_database(pool: &PgPool) -> Option<u64> {
    let start = Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .ok()
        .map(|_| start.elapsed().as_millis() as u64)
}

/// Detailed health report covering the database and gateway mode.
///
/// Answers 503 with no body when the database probe fails, so load
/// balancers treat the instance as down without parsing JSON.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let latency_ms = probe_database(&state.pool).await;
    let connected = latency_ms.is_some();

    if !connected {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            connected,
            latency_ms,
        },
        payment_gateway: GatewayHealth {
            mock: state.config.gateway.mock,
        },
    }))
}

/// Liveness probe. Succeeds whenever the process can serve a request.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse { status: "alive" })
}

/// Readiness probe. Succeeds only when the database answers.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match probe_database(&state.pool).await {
        Some(_) => Ok(Json(StatusResponse { status: "ready" })),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_report_serializes_latency_and_mode() {
        let report = HealthResponse {
            status: "healthy",
            version: "0.6.0",
            database: DatabaseHealth {
                connected: true,
                latency_ms: Some(4),
            },
            payment_gateway: GatewayHealth { mock: true },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"]["connected"], true);
        assert_eq!(json["database"]["latency_ms"], 4);
        assert_eq!(json["payment_gateway"]["mock"], true);
    }

    #[test]
    fn unreachable_database_omits_latency() {
        let report = DatabaseHealth {
            connected: false,
            latency_ms: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["connected"], false);
        assert!(json["latency_ms"].is_null());
    }

    #[test]
    fn probe_body_carries_plain_status() {
        let json = serde_json::to_string(&StatusResponse { status: "alive" }).unwrap();
        assert_eq!(json, r#"{"status":"alive"}"#);
    }
}
