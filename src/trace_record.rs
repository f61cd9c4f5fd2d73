//! Trace record shapes shared by the store and the HTTP surface.
//!
//! A trace is one captured UI event: a network request/response seen by the
//! browser extension, or a user action (click, input) with its locator. The
//! schema is deliberately loose; the object-valued fields stay generic
//! ordered JSON maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A persisted trace row, id assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub id: i64,
    pub kind: String,
    /// Epoch milliseconds.
    pub ts: i64,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub status: Option<i64>,
    pub headers: Option<Map<String, Value>>,
    pub body: Option<Map<String, Value>>,
    pub label: Option<String>,
    pub locator: Option<String>,
    pub fields: Option<Map<String, Value>>,
}

/// Create-request shape: a [`TraceRecord`] before the store assigns an id.
///
/// `kind` and `ts` are required; everything else defaults to `None` when
/// absent from the incoming JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrace {
    pub kind: String,
    pub ts: i64,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub headers: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<Map<String, Value>>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub locator: Option<String>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

impl NewTrace {
    /// Attach the store-assigned id, producing the persisted shape.
    pub fn into_record(self, id: i64) -> TraceRecord {
        TraceRecord {
            id,
            kind: self.kind,
            ts: self.ts,
            request_id: self.request_id,
            url: self.url,
            method: self.method,
            status: self.status,
            headers: self.headers,
            body: self.body,
            label: self.label,
            locator: self.locator,
            fields: self.fields,
        }
    }
}
