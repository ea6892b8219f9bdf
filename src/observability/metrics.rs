//! Metrics collection and exposition.
//!
//! # Metrics
//! - `geo_router_decisions_total` (counter): decisions by outcome, region
//! - `geo_router_origin_fallbacks_total` (counter): origin-table misses by
//!   the region that had no origin
//! - `geo_router_request_duration_seconds` (histogram): host-side latency
//!   by outcome and status
//!
//! # Design Decisions
//! - Recorded by the host around the decision, never inside it
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::decision::{Outcome, Resolution};

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Count one routing decision.
pub fn record_decision(outcome: Outcome, resolution: &Resolution) {
    let region = resolution
        .served_by
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "none".to_string());

    metrics::counter!(
        "geo_router_decisions_total",
        "outcome" => outcome.as_str(),
        "region" => region
    )
    .increment(1);

    if resolution.fallback_used() {
        let missing = resolution
            .region
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_default();
        metrics::counter!("geo_router_origin_fallbacks_total", "region" => missing).increment(1);
    }
}

/// Record host-side handling time.
pub fn record_request(outcome: Outcome, status: u16, start: Instant) {
    metrics::histogram!(
        "geo_router_request_duration_seconds",
        "outcome" => outcome.as_str(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
