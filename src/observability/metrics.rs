//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_fetch_total` (counter): backend fetches by slice, outcome
//! - `console_fetch_retries_total` (counter): retried requests by path
//! - `console_cache_dispatch_total` (counter): store actions by kind
//! - `console_cache_size` (gauge): records held per slice
//! - `console_validation_failures_total` (counter): invalid fields by form kind
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter only when enabled in config

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_fetch(slice: &'static str, outcome: &'static str) {
    metrics::counter!("console_fetch_total", "slice" => slice, "outcome" => outcome).increment(1);
}

pub fn record_retry(path: &str) {
    metrics::counter!("console_fetch_retries_total", "path" => path.to_string()).increment(1);
}

pub fn record_dispatch(action: &'static str) {
    metrics::counter!("console_cache_dispatch_total", "action" => action).increment(1);
}

pub fn record_cache_size(slice: &'static str, size: usize) {
    metrics::gauge!("console_cache_size", "slice" => slice).set(size as f64);
}

pub fn record_validation_failures(kind: &'static str, invalid_fields: usize) {
    if invalid_fields > 0 {
        metrics::counter!("console_validation_failures_total", "kind" => kind)
            .increment(invalid_fields as u64);
    }
}
