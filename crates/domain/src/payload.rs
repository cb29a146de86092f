//! Dispatch payload: what a bound route hands to the action bus.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::MessageId;
use crate::method::HttpMethod;

/// Per-request message created fresh by the dispatch handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchPayload {
    pub id: MessageId,
    pub request: RequestMeta,
    pub args: Args,
}

impl DispatchPayload {
    /// Build a payload with a fresh [`MessageId`].
    #[must_use]
    pub fn new(request: RequestMeta, args: Args) -> Self {
        Self {
            id: MessageId::new(),
            request,
            args,
        }
    }
}

/// The parts of the incoming HTTP request exposed to action handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMeta {
    pub method: HttpMethod,
    pub path: String,
    /// Header values that are valid UTF-8, keyed by lower-case name.
    pub headers: BTreeMap<String, String>,
    pub received_at: DateTime<Utc>,
}

impl RequestMeta {
    /// Request metadata stamped with the current time.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            received_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

/// Request arguments: the body and a shallow copy of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    /// Parsed body for `POST`/`PUT`; `{}` for other methods, `null` when
    /// parsing is left to an upstream parser that did not run.
    pub body: Value,
    pub query: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_args_under_body_and_query() {
        let mut query = Map::new();
        query.insert("foo".to_string(), json!("bar"));
        let args = Args {
            body: json!({"a": 1}),
            query,
        };

        let payload = DispatchPayload::new(RequestMeta::new(HttpMethod::Post, "/echo"), args);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["args"], json!({"body": {"a": 1}, "query": {"foo": "bar"}}));
        assert_eq!(value["request"]["method"], json!("POST"));
        assert_eq!(value["request"]["path"], json!("/echo"));
    }

    #[test]
    fn should_default_to_null_body_and_empty_query() {
        let args = Args::default();
        assert!(args.body.is_null());
        assert!(args.query.is_empty());
    }
}
