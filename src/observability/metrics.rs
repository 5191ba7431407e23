//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (relay outcomes, latency, annotations, retention)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed calls by method, outcome
//! - `relay_request_duration_seconds` (histogram): target round-trip latency
//! - `annotation_requests_total` (counter): annotations by kind, outcome
//! - `history_purged_total` (counter): entries removed by retention
//!
//! # Design Decisions
//! - Labels stay low-cardinality: no URLs, no ids
//! - Outcome is the status class ("2xx", "4xx") or "unreachable" / "invalid"

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Status class label for a target response.
pub fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub fn record_relay(method: &str, outcome: &'static str) {
    counter!(
        "relay_requests_total",
        "method" => method.to_uppercase(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Only calls that produced a response have a meaningful latency.
pub fn record_relay_latency(elapsed: Duration) {
    histogram!("relay_request_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_annotation(kind: &'static str, outcome: &'static str) {
    counter!("annotation_requests_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_history_purged(count: u64) {
    counter!("history_purged_total").increment(count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(301), "3xx");
        assert_eq!(status_class(404), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(101), "1xx");
    }

    #[test]
    fn test_recording_without_exporter_is_noop() {
        record_relay("get", "2xx");
        record_relay_latency(Duration::from_millis(12));
        record_annotation("documentation", "disabled");
        record_history_purged(3);
    }
}
