//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): evaluated requests by route, outcome
//! - `redirect_unmatched_total` (counter): requests no route claimed, by kind
//! - `redirect_evaluation_seconds` (histogram): condition evaluation latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus endpoint only when `observability.metrics_address` is set

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Outcome;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one evaluated request.
pub fn record_outcome(route: &str, outcome: Outcome, started: Instant) {
    metrics::counter!(
        "redirect_requests_total",
        "route" => route.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    metrics::histogram!("redirect_evaluation_seconds", "route" => route.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a request that matched no route.
pub fn record_unmatched(kind: &'static str) {
    metrics::counter!("redirect_unmatched_total", "kind" => kind).increment(1);
}
