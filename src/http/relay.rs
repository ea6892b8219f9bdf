//! Relaying forwarded requests to their regional origin.
//!
//! # Responsibilities
//! - Build the upstream URL from the origin descriptor and request target
//! - Copy end-to-end headers both ways, including the routing headers
//! - Map the origin's response back to the viewer
//!
//! # Design Decisions
//! - Hop-by-hop headers are stripped in both directions
//! - Bodies are buffered; the edge host is a development and small-scale
//!   deployment surface, not a streaming proxy
//! - Redirects from the origin are passed to the viewer, not followed

use axum::body::{Body, Bytes};
use axum::http::{HeaderName, Method};
use axum::response::Response;

use crate::edge::request::IncomingRequest;
use crate::routing::path::request_target;
use crate::routing::table::OriginDescriptor;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Full URL of the request at its origin.
pub fn upstream_url(origin: &OriginDescriptor, request: &IncomingRequest) -> String {
    format!("{}{}", origin.base_url(), request_target(request))
}

/// Send the rewritten request to its origin and return the origin's answer.
pub async fn relay(
    client: &reqwest::Client,
    method: Method,
    origin: &OriginDescriptor,
    request: &IncomingRequest,
    body: Bytes,
) -> Result<Response, reqwest::Error> {
    let mut upstream = client.request(method, upstream_url(origin, request));
    for (name, entries) in &request.headers {
        if is_hop_by_hop(name) {
            continue;
        }
        for entry in entries {
            upstream = upstream.header(name.as_str(), entry.value.as_str());
        }
    }

    let upstream_response = upstream.body(body).send().await?;
    let status = upstream_response.status();
    let headers: Vec<(HeaderName, _)> = upstream_response
        .headers()
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let bytes = upstream_response.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    for (name, value) in headers {
        response.headers_mut().append(name, value);
    }
    Ok(response)
}
