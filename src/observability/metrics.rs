//! Metrics collection and exposition.
//!
//! # Metrics
//! - `form_relay_submissions_total` (counter): POSTs by forward outcome
//! - `form_relay_datagrams_total` (counter): relay datagrams by outcome
//! - `form_relay_pages_total` (counter): GET responses by page kind and status
//!
//! Recording is a no-op until [`init_metrics`] installs an exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a form submission and whether its datagram was handed off.
pub fn record_submission(outcome: &'static str) {
    metrics::counter!("form_relay_submissions_total", "outcome" => outcome).increment(1);
}

/// Record one relay datagram outcome (`stored`, `decode_error`, `store_error`).
pub fn record_datagram(outcome: &'static str) {
    metrics::counter!("form_relay_datagrams_total", "outcome" => outcome).increment(1);
}

/// Record a page response.
pub fn record_page(page: &'static str, status: u16) {
    metrics::counter!(
        "form_relay_pages_total",
        "page" => page,
        "status" => status.to_string()
    )
    .increment(1);
}
