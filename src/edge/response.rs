//! Marshaling decisions back into the edge result shape.
//!
//! # Design Decisions
//! - Status is a string, as the edge runtime expects (`"302"`, `"403"`)
//! - Forwarded requests are returned as the (rewritten) request object
//! - Results serialize untagged: the runtime tells them apart by shape

use serde::{Deserialize, Serialize};

use crate::edge::request::{HeaderEntry, Headers, IncomingRequest};
use crate::routing::decision::RoutingDecision;

/// A generated response the edge sends without contacting an origin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    pub status: String,
    pub status_description: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// What the function hands back to the edge runtime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EdgeResult {
    Response(EdgeResponse),
    Request(IncomingRequest),
}

impl From<RoutingDecision> for EdgeResult {
    fn from(decision: RoutingDecision) -> Self {
        match decision {
            RoutingDecision::Forward { request, .. } => EdgeResult::Request(request),
            RoutingDecision::Redirect { location, status } => {
                let mut headers = Headers::new();
                headers.insert("location".into(), vec![HeaderEntry::new("Location", location)]);
                EdgeResult::Response(EdgeResponse {
                    status: status.as_u16().to_string(),
                    status_description: status.canonical_reason().unwrap_or("Found").to_string(),
                    headers,
                    body: None,
                })
            }
            RoutingDecision::Deny { status, body } => {
                let mut headers = Headers::new();
                headers.insert(
                    "content-type".into(),
                    vec![HeaderEntry::new("Content-Type", "text/plain")],
                );
                EdgeResult::Response(EdgeResponse {
                    status: status.as_u16().to_string(),
                    status_description: status.canonical_reason().unwrap_or("Forbidden").to_string(),
                    headers,
                    body: Some(body),
                })
            }
        }
    }
}
