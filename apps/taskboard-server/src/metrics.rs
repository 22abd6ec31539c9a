//! Prometheus metrics for taskboard-server.
//!
//! Request counters and latency histograms, rendered at the ops listener's
//! `/metrics` endpoint.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder and return a handle for rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "taskboard_http_requests_total",
        "Total number of HTTP requests processed"
    );
    describe_histogram!(
        "taskboard_http_request_duration_seconds",
        "Duration of HTTP requests in seconds"
    );

    Ok(handle)
}

/// Axum middleware: record count and latency per route template and status.
pub async fn track_http(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    counter!(
        "taskboard_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string(),
    )
    .increment(1);
    histogram!(
        "taskboard_http_request_duration_seconds",
        "method" => method,
        "path" => path,
    )
    .record(start.elapsed().as_secs_f64());

    response
}
