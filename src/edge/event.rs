//! Edge trigger event envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::edge::request::IncomingRequest;

/// Errors unwrapping an event. Everything inside the request itself is
/// handled by the decision function without failing.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event contains no records")]
    NoRecords,

    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),
}

/// An invocation event: `{"Records": [{"cf": {"config": ..., "request": ...}}]}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EdgeEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EdgeRecord {
    pub cf: CfPayload,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CfPayload {
    /// Distribution metadata; carried but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    pub request: IncomingRequest,
}

impl EdgeEvent {
    /// Wrap a single request as an event.
    pub fn from_request(request: IncomingRequest) -> Self {
        Self {
            records: vec![EdgeRecord {
                cf: CfPayload {
                    config: None,
                    request,
                },
            }],
        }
    }

    pub fn from_slice(payload: &[u8]) -> Result<Self, EventError> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// The request of the first record; the edge delivers one per event.
    pub fn into_request(self) -> Result<IncomingRequest, EventError> {
        self.records
            .into_iter()
            .next()
            .map(|record| record.cf.request)
            .ok_or(EventError::NoRecords)
    }
}
