//! Routing decision types.

use axum::http::StatusCode;

use crate::edge::request::IncomingRequest;
use crate::routing::country::ViewerCountry;
use crate::routing::table::{OriginDescriptor, RegionId};

/// Body of the 403 sent to viewers outside the allow-list.
pub const DENY_BODY: &str = "Access denied from this location";

/// Header recording the region a forwarded request was routed to.
pub const ROUTED_REGION_HEADER: &str = "X-Routed-Region";

/// Header recording the viewer country a forwarded request was routed on.
pub const VIEWER_COUNTRY_ECHO_HEADER: &str = "X-Viewer-Country";

/// What the edge should do with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// Send the rewritten request to the origin.
    Forward {
        origin: OriginDescriptor,
        request: IncomingRequest,
    },
    /// Answer with a redirect to the regional host.
    Redirect { location: String, status: StatusCode },
    /// Refuse the request.
    Deny { status: StatusCode, body: String },
}

impl RoutingDecision {
    pub fn redirect(location: String) -> Self {
        RoutingDecision::Redirect {
            location,
            status: StatusCode::FOUND,
        }
    }

    pub fn deny() -> Self {
        RoutingDecision::Deny {
            status: StatusCode::FORBIDDEN,
            body: DENY_BODY.to_string(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            RoutingDecision::Forward { .. } => Outcome::Forward,
            RoutingDecision::Redirect { .. } => Outcome::Redirect,
            RoutingDecision::Deny { .. } => Outcome::Deny,
        }
    }
}

/// Decision kind, used for logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Forward,
    Redirect,
    Deny,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Forward => "forward",
            Outcome::Redirect => "redirect",
            Outcome::Deny => "deny",
        }
    }
}

/// How a decision was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Country read from the request.
    pub country: ViewerCountry,
    /// True when the country was found in the routing table.
    pub matched: bool,
    /// Region the country resolved to; `None` when denied.
    pub region: Option<RegionId>,
    /// Region whose origin actually serves the request; differs from
    /// `region` when the origin table had no entry for it.
    pub served_by: Option<RegionId>,
}

impl Resolution {
    pub fn fallback_used(&self) -> bool {
        self.served_by.is_some() && self.served_by != self.region
    }
}

/// A decision together with the resolution that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed<T = RoutingDecision> {
    pub resolution: Resolution,
    pub outcome: Outcome,
    pub decision: T,
}

impl<T> Routed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Routed<U> {
        Routed {
            resolution: self.resolution,
            outcome: self.outcome,
            decision: f(self.decision),
        }
    }
}
