//! HTTP and business metrics.
//!
//! Request counters and latency histograms are recorded per route
//! template, and a handful of business counters track marketplace
//! activity. The `/metrics` endpoint renders Prometheus text format.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder.
///
/// Call exactly once at startup, before the first metric is recorded.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])
        .expect("histogram buckets must be non-empty")
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        panic!("Prometheus recorder installed twice");
    }
}

/// Records `http_requests_total` and `http_request_duration_seconds` for
/// every request, labelled by method, route template and status.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = method_label(req.method());
    // The route template ("/api/v1/campaigns/:id") keeps label cardinality
    // bounded; raw paths would mint a label per uuid.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method,
        "path" => route.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Records a campaign application submission.
pub fn record_application_submitted() {
    counter!("applications_submitted_total").increment(1);
}

/// Records a processed gateway webhook event, labelled by event type.
pub fn record_webhook_event(event_type: &str) {
    counter!(
        "gateway_webhook_events_total",
        "event_type" => event_type.to_string()
    )
    .increment(1);
}

/// Records a completed checkout payment.
pub fn record_payment_completed(amount_cents: i64) {
    counter!("payments_completed_total").increment(1);
    counter!("payments_completed_cents_total").increment(amount_cents.max(0) as u64);
}

/// GET /metrics in Prometheus exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}
