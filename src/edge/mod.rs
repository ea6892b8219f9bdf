//! Edge runtime wire format.
//!
//! # Data Flow
//! ```text
//! invocation payload (JSON)
//!     → event.rs (EdgeEvent → first record's request)
//!     → routing::GeoRouter::route
//!     → response.rs (RoutingDecision → EdgeResult)
//!     → JSON back to the edge runtime
//! ```

pub mod event;
pub mod request;
pub mod response;

pub use event::{EdgeEvent, EventError};
pub use request::{HeaderEntry, Headers, IncomingRequest};
pub use response::{EdgeResponse, EdgeResult};

use crate::routing::decision::Routed;
use crate::routing::router::GeoRouter;

/// Run one edge event through the router.
pub fn handle_event(router: &GeoRouter, event: EdgeEvent) -> Result<Routed<EdgeResult>, EventError> {
    let request = event.into_request()?;
    Ok(router.route(request).map(EdgeResult::from))
}

/// Parse a raw invocation payload and run it through the router.
pub fn handle_event_json(router: &GeoRouter, payload: &[u8]) -> Result<Routed<EdgeResult>, EventError> {
    handle_event(router, EdgeEvent::from_slice(payload)?)
}
