//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Convert a live HTTP request into the edge request shape
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing; an ID supplied by
//!   the CDN is kept
//! - Header names are lowercased as the edge runtime delivers them
//! - Non-UTF-8 header values are dropped, never a reason to fail

use std::net::IpAddr;

use axum::http::{request::Parts, HeaderMap, HeaderValue, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::edge::request::IncomingRequest;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Issues a fresh UUID v4 for requests arriving without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeRequestId;

impl MakeRequestId for EdgeRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID header value, or `unknown`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the edge request the decision function sees.
pub fn to_incoming(parts: &Parts, client_ip: Option<IpAddr>) -> IncomingRequest {
    let mut incoming = IncomingRequest::new(parts.method.as_str(), parts.uri.path());
    incoming.querystring = parts.uri.query().map(str::to_string);

    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(value) => incoming.append_header(name.as_str(), value),
            Err(_) => tracing::debug!(header = %name, "Dropping non-UTF-8 header value"),
        }
    }

    if let Some(ip) = client_ip {
        incoming
            .extra
            .insert("clientIp".to_string(), Value::String(ip.to_string()));
    }

    incoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn parts(request: Request<Body>) -> Parts {
        request.into_parts().0
    }

    #[test]
    fn test_to_incoming_splits_path_and_query() {
        let p = parts(
            Request::builder()
                .method("POST")
                .uri("http://edge.example.com/blog/post?ref=1&x=%20")
                .header("CloudFront-Viewer-Country", "IE")
                .header("Accept", "text/html")
                .header("Accept", "application/json")
                .body(Body::empty())
                .unwrap(),
        );

        let incoming = to_incoming(&p, Some("203.0.113.7".parse().unwrap()));
        assert_eq!(incoming.method, "POST");
        assert_eq!(incoming.path(), "/blog/post");
        assert_eq!(incoming.query(), "ref=1&x=%20");
        assert_eq!(incoming.header("cloudfront-viewer-country"), Some("IE"));
        assert_eq!(incoming.headers["accept"].len(), 2);
        assert_eq!(incoming.extra["clientIp"], "203.0.113.7");
    }

    #[test]
    fn test_to_incoming_without_query() {
        let p = parts(Request::builder().uri("/").body(Body::empty()).unwrap());
        let incoming = to_incoming(&p, None);
        assert_eq!(incoming.querystring, None);
        assert!(incoming.extra.is_empty());
    }

    #[test]
    fn test_request_id_default() {
        assert_eq!(request_id(&HeaderMap::new()), "unknown");

        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_make_request_id_is_uuid() {
        let request = Request::builder().body(()).unwrap();
        let id = EdgeRequestId.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
