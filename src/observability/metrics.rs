//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_resolutions_total` (counter): pipeline outcome (direct,
//!   rewrite, redirect, custom_404, pretty_404, or an error kind)
//! - `gateway_rules_files_total` (counter): `_redirects` loads by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    metrics::counter!("gateway_requests_total", "method" => method.clone(), "status" => status.clone())
        .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_outcome(outcome: &'static str) {
    metrics::counter!("gateway_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_rules_file(result: &'static str) {
    metrics::counter!("gateway_rules_files_total", "result" => result).increment(1);
}
