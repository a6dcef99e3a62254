//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vanity_requests_total` (counter): requests by page, status
//! - `vanity_request_duration_seconds` (histogram): latency by page
//! - `vanity_lookups_total` (counter): resolver lookups by outcome
//! - `vanity_registered_paths` (gauge): size of the resolver index
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(page: &'static str, status: u16, start: Instant) {
    counter!("vanity_requests_total", "page" => page, "status" => status.to_string()).increment(1);
    histogram!("vanity_request_duration_seconds", "page" => page)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_lookup(matched: bool) {
    let outcome = if matched { "hit" } else { "miss" };
    counter!("vanity_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_registered_paths(count: usize) {
    gauge!("vanity_registered_paths").set(count as f64);
}
