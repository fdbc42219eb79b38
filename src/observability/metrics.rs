//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upstream_selected_total` (counter): selections by endpoint
//! - `upstream_selection_failures_total` (counter): 503s handed to the
//!   proxying layer
//! - `upstream_admin_ops_total` (counter): admin mutations by operation

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener. Recording is a
/// no-op until this runs, so tests and embedded uses can skip it.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

pub fn record_selection(endpoint: &str) {
    metrics::counter!("upstream_selected_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_selection_failure() {
    metrics::counter!("upstream_selection_failures_total").increment(1);
}

pub fn record_admin_op(op: &'static str) {
    metrics::counter!("upstream_admin_ops_total", "op" => op).increment(1);
}
