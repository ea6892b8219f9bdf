//! The request object handed over by the edge runtime.
//!
//! Mirrors the CloudFront origin-request shape: lowercase header names
//! mapping to lists of `{key, value}` entries, a URI without its query, and a
//! separate query string. Fields this crate does not interpret (`body`,
//! `clientIp`, custom-origin tuning knobs, ...) are carried through untouched
//! so a forwarded request round-trips losslessly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::routing::table::OriginDescriptor;

/// Header collection keyed by lowercase header name.
pub type Headers = BTreeMap<String, Vec<HeaderEntry>>;

/// A single header value with its original-case name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeaderEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Missing in a malformed entry; read as empty.
    #[serde(default)]
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }
}

fn default_method() -> String {
    "GET".to_string()
}

/// Incoming viewer request, read-only to the decision logic.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequest {
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<String>,

    #[serde(default)]
    pub headers: Headers,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for IncomingRequest {
    fn default() -> Self {
        Self {
            method: default_method(),
            uri: None,
            querystring: None,
            headers: Headers::new(),
            origin: None,
            extra: Map::new(),
        }
    }
}

impl IncomingRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.querystring = Some(query.into());
        self
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.append_header(key, value);
        self
    }

    /// URI path; a missing or empty URI is treated as `/`.
    pub fn path(&self) -> &str {
        match self.uri.as_deref() {
            Some(uri) if !uri.is_empty() => uri,
            _ => "/",
        }
    }

    /// Raw query string without the leading `?`; missing is empty.
    pub fn query(&self) -> &str {
        self.querystring.as_deref().unwrap_or("")
    }

    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, entries)| entries.first())
            .map(|entry| entry.value.as_str())
    }

    /// Add a value to a header, keeping existing values.
    pub fn append_header(&mut self, key: &str, value: impl Into<String>) {
        self.headers
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(HeaderEntry::new(key, value));
    }

    /// Replace every value of a header (under any casing) with one value.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        self.headers.retain(|name, _| !name.eq_ignore_ascii_case(key));
        self.headers
            .insert(key.to_ascii_lowercase(), vec![HeaderEntry::new(key, value)]);
    }

    /// Point the request at a custom origin.
    ///
    /// Tuning fields already present on a custom origin are kept; an S3 or
    /// absent origin is replaced by a custom origin with CloudFront's
    /// required defaults.
    pub fn set_custom_origin(&mut self, descriptor: &OriginDescriptor) {
        let mut custom = match self.origin.take().and_then(|o| o.custom) {
            Some(existing) => existing,
            None => CustomOrigin::with_defaults(),
        };
        custom.domain_name = descriptor.host.clone();
        custom.port = descriptor.port;
        custom.protocol = descriptor.scheme.as_str().to_string();
        custom.path = descriptor.path_prefix.clone();

        self.origin = Some(Origin {
            custom: Some(custom),
            extra: Map::new(),
        });
    }
}

/// Origin target of a request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomOrigin>,

    /// Other origin kinds (`s3`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Custom (HTTP) origin target.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrigin {
    pub domain_name: String,
    pub port: u16,
    pub protocol: String,
    #[serde(default)]
    pub path: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomOrigin {
    fn with_defaults() -> Self {
        let mut extra = Map::new();
        extra.insert("customHeaders".into(), json!({}));
        extra.insert("keepaliveTimeout".into(), json!(5));
        extra.insert("readTimeout".into(), json!(30));
        extra.insert("sslProtocols".into(), json!(["TLSv1.2"]));
        Self {
            domain_name: String::new(),
            port: 0,
            protocol: String::new(),
            path: String::new(),
            extra,
        }
    }
}
