//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Host adapters (http server, CLI) produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → audit() (one event per routing decision)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID attached to every decision event
//! - The decision function stays side-effect free; hosts report its
//!   Resolution after the fact

pub mod logging;
pub mod metrics;

use crate::routing::decision::{Outcome, Resolution};

/// Log and count one routing decision. Origin fallbacks are warnings since
/// they point at a configuration defect.
pub fn audit(request_id: &str, outcome: Outcome, resolution: &Resolution) {
    let region = resolution.region.as_ref().map(|r| r.as_str()).unwrap_or("none");
    let served_by = resolution.served_by.as_ref().map(|r| r.as_str()).unwrap_or("none");

    if resolution.fallback_used() {
        tracing::warn!(
            request_id = %request_id,
            country = %resolution.country.as_str(),
            region = %region,
            served_by = %served_by,
            "Region has no origin; served by fallback region"
        );
    }

    tracing::debug!(
        request_id = %request_id,
        country = %resolution.country.as_str(),
        matched = resolution.matched,
        region = %region,
        served_by = %served_by,
        outcome = outcome.as_str(),
        "Routing decision"
    );

    self::metrics::record_decision(outcome, resolution);
}
