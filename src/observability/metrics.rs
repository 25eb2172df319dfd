//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gemini_requests_total` (counter): exchanges by outcome (status class
//!   or failure kind)
//! - `gemini_request_duration_seconds` (histogram): exchange latency
//! - `gateway_http_requests_total` (counter): HTTP responses by status
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished Gemini exchange.
pub fn record_exchange(outcome: &'static str, start: Instant) {
    metrics::counter!("gemini_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("gemini_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one HTTP response served by the gateway.
pub fn record_http_response(status: u16) {
    metrics::counter!("gateway_http_requests_total", "status" => status.to_string()).increment(1);
}
