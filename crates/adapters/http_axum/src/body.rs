//! Request body and query-string parsing.
//!
//! Bodies are read up to a byte limit and decoded by content type:
//! JSON (`application/json`, `*+json`, or no content type at all),
//! urlencoded forms, and `text/*`. An empty body decodes to `{}`.
//! Repeated form or query keys collapse into an array of strings.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::{ParseError, RouteError};

/// A body parsed by an upstream parser, stored in the request extensions.
///
/// Read by dispatch handlers of binders configured with `parse_body = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody(pub Value);

/// Byte limit handed to [`parser`] as middleware state.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

/// Read and decode a request body.
///
/// # Errors
///
/// Returns [`ParseError::TooLarge`] past `limit` bytes, a decoding error for
/// malformed content, or [`ParseError::UnsupportedMediaType`] for content
/// types that are neither JSON, form nor text.
pub async fn parse(headers: &HeaderMap, body: Body, limit: usize) -> Result<Value, ParseError> {
    if content_length(headers).is_some_and(|len| len > limit) {
        return Err(ParseError::TooLarge { limit });
    }

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|err| read_error(err, limit))?;
    decode(headers, &bytes)
}

/// Parse the query string into a fresh map.
///
/// # Errors
///
/// Returns [`ParseError::Query`] when the query string cannot be decoded.
pub fn query(raw: Option<&str>) -> Result<Map<String, Value>, ParseError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(raw.unwrap_or_default()).map_err(ParseError::Query)?;
    Ok(collect_pairs(pairs))
}

/// Upstream body parser middleware.
///
/// Parses every request body and stores the result as [`ParsedBody`] so
/// that routes bound with `parse_body = false` can pick it up:
///
/// ```ignore
/// let app = router.layer(axum::middleware::from_fn_with_state(
///     BodyLimit(DEFAULT_BODY_LIMIT),
///     body::parser,
/// ));
/// ```
pub async fn parser(State(limit): State<BodyLimit>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    match parse(&parts.headers, body, limit.0).await {
        Ok(value) => {
            parts.extensions.insert(ParsedBody(value));
            next.run(Request::from_parts(parts, Body::empty())).await
        }
        Err(err) => RouteError::from(err).into_response(),
    }
}

fn decode(headers: &HeaderMap, bytes: &[u8]) -> Result<Value, ParseError> {
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(essence);

    match content_type.as_deref() {
        None => serde_json::from_slice(bytes).map_err(ParseError::Json),
        Some(ct) if ct == "application/json" || ct.ends_with("+json") => {
            serde_json::from_slice(bytes).map_err(ParseError::Json)
        }
        Some("application/x-www-form-urlencoded") => {
            let pairs: Vec<(String, String)> =
                serde_urlencoded::from_bytes(bytes).map_err(ParseError::Form)?;
            Ok(Value::Object(collect_pairs(pairs)))
        }
        Some(ct) if ct.starts_with("text/") => String::from_utf8(bytes.to_vec())
            .map(Value::String)
            .map_err(ParseError::Utf8),
        Some(ct) => Err(ParseError::UnsupportedMediaType {
            content_type: ct.to_string(),
        }),
    }
}

/// Media type without parameters, lower-cased (`Application/JSON; charset=utf-8` → `application/json`).
fn essence(content_type: &str) -> String {
    content_type
        .split_once(';')
        .map_or(content_type, |(essence, _)| essence)
        .trim()
        .to_ascii_lowercase()
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn read_error(err: axum::Error, limit: usize) -> ParseError {
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return ParseError::TooLarge { limit };
        }
        source = cause.source();
    }
    ParseError::Read(err)
}

fn collect_pairs(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        match map.get_mut(&key) {
            None => {
                map.insert(key, Value::String(value));
            }
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }
    map
}
